//! History store errors

use thiserror::Error;

use crate::utils::AtomicError;

/// Result type for history store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in history store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("write failed: {0}")]
    Atomic(#[from] AtomicError),

    /// Persisted history is readable JSON but not a list of battle records
    #[error("invalid history format: {0}")]
    InvalidFormat(String),

    /// An incoming record lacks one of the required fields
    #[error("record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },
}
