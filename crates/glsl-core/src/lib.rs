//! Foundational data structures shared across the GLSL front-end: monotonic
//! arena allocation, atom interning, and source-text storage.
//!
//! This crate has no dependents of its own within the workspace; everything
//! here is infrastructure a single translation unit needs regardless of
//! which stage (lexer, parser, checker) is touching it.

pub mod arena;
pub mod error;
pub mod interner;
pub mod source;

pub use arena::Arena;
pub use error::CoreError;
pub use interner::{Atom, AtomTable};
pub use source::{FileId, SourceContext, SourceKind};
