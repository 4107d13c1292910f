//! Core error types for `pawns-core`.

use thiserror::Error;

/// Core error type for model-level operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data encountered while building a model.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid proxy string.
    #[error("Invalid proxy string: {0}")]
    InvalidProxy(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
