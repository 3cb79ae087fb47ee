//! Error types for the profiling crate.

use thiserror::Error;

/// Errors that can occur while profiling.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// `exit` was called with no open span besides the session root
    #[error("exit called with no open span")]
    StackUnderflow,

    /// Failed to serialize the span tree
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for profiling operations.
pub type ProfileResult<T> = Result<T, ProfileError>;
