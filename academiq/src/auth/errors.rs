//! Session persistence error types.

use thiserror::Error;

/// Errors raised by a [`SessionStorage`](super::storage::SessionStorage) backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings
    #[error("Storage file is corrupt: {0}")]
    Corrupt(String),

    /// A stored value could not be encoded
    #[error("Could not encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
