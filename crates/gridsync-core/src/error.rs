//! Error types for GridSync

use thiserror::Error;

/// Core error type shared by the store contract and the bridge
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Concurrency conflict: {0}")]
    Concurrency(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for GridSync operations
pub type GridResult<T> = std::result::Result<T, GridError>;
