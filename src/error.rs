//! Error types shared by the level loader, the math kernel and the renderer.
//!
//! Library operations return [`Result<T>`]. Process-level setup (window,
//! device, event loop) keeps using `anyhow` since nothing there is handled
//! by kind.

use thiserror::Error;

/// Everything the viewer core can fail with.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A texture (or other asset) referenced by the level could not be resolved.
    #[error("could not resolve resource `{name}`: {reason}")]
    ResourceResolution { name: String, reason: String },

    /// The operation is not available for the given input.
    #[error("unsupported operation `{operation}`: {reason}")]
    UnsupportedOperation {
        operation: &'static str,
        reason: &'static str,
    },

    /// The level description did not have the expected shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl ViewerError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    pub fn resolution(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ResourceResolution {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
