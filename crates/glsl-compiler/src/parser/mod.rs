//! Recursive-descent parser: token stream in, typed [`Module`](crate::ast::Module)
//! nodes out, via [`AstBuilder`](crate::ast::builder::AstBuilder).
//!
//! # Recovery strategy
//!
//! The parser never aborts on malformed input — it always finishes and
//! returns a complete module, with each unrecoverable construct replaced by
//! an `Error` node and a diagnostic. Recovery follows the resync-target
//! table in [`RecoveryMode`]: a missing token is reported but not consumed
//! (the caller above may still make sense of it), while a genuinely
//! unparseable construct resyncs to the next `;`, the matching closing
//! delimiter, or — for initializer lists — the brace depth the list itself
//! opened. `StepBudget`/`RecursionBudget` bound pathological input (runaway
//! left-recursion-shaped typos, thousands of nested parens) to a fixed
//! amount of work rather than looping or overflowing the stack.

mod core;
mod grammar;
mod recovery;

pub use core::{Parser, RecursionBudget, StepBudget};
pub use recovery::RecoveryMode;
