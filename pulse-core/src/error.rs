//! Error types for Pulse store operations.
//!
//! "Not found" is never an error anywhere in the workspace - lookups return
//! `bool` or `Option` so callers can branch without try/catch ceremony.
//! `StoreError` is reserved for genuine storage faults.

use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Serialization failed for document {key}: {reason}")]
    Serialize { key: String, reason: String },

    #[error("Backend write failed for document {key}: {reason}")]
    Backend { key: String, reason: String },
}

/// Result alias used across the workspace.
pub type PulseResult<T> = Result<T, StoreError>;
