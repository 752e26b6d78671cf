//! Host-visible failures from the foundational layer (arena, interning,
//! source context). In-band compiler findings are never represented here —
//! those live in `glsl-compiler`'s diagnostic sink.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("source not found: {path}")]
    SourceNotFound { path: String },
}
