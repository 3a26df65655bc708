//! Store error types

use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Key segment of {0} bytes exceeds 255")]
    KeyTooLong(usize),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Index corrupted: {0}")]
    IndexCorrupted(String),

    #[error("Sequence {0} overflowed")]
    SequenceOverflow(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Store failures on module-owned data are bookkeeping faults
impl From<StoreError> for escrow_types::EscrowError {
    fn from(e: StoreError) -> Self {
        escrow_types::EscrowError::invariant(e.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
