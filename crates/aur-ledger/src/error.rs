//! Ledger error types
//!
//! Rejected blocks are not errors; see [`InsertResult`](crate::InsertResult).
//! Everything here means the ledger cannot continue normally.

use aur_storage::StorageError;
use thiserror::Error;

/// Fatal ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Underlying store failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Writer stopped after a fatal storage failure
    #[error("ledger writer halted")]
    Halted,

    /// Writer is gone
    #[error("write queue closed")]
    QueueClosed,

    /// No queue slot became free within the admission timeout
    #[error("write queue full")]
    QueueFull,

    /// Invalid configuration
    #[error("invalid config: {0}")]
    Config(String),

    /// Writer thread could not be started
    #[error("failed to spawn writer: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
