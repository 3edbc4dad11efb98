//! Storage error types

use crate::traits::Table;
use thiserror::Error;

/// Storage errors
///
/// Every variant is fatal to the ledger: the store is in an unknown state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// RocksDB error
    #[error("rocksdb error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// A stored record failed to decode
    #[error("corrupt record in {table}: {reason}")]
    Corrupt {
        /// Table holding the record
        table: Table,
        /// What was wrong
        reason: String,
    },

    /// Arithmetic on stored values overflowed
    #[error("overflow: {0}")]
    Overflow(String),

    /// Invalid column family
    #[error("invalid column family: {0}")]
    InvalidColumnFamily(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Build a corruption error
    pub fn corrupt(table: Table, reason: impl Into<String>) -> Self {
        StorageError::Corrupt {
            table,
            reason: reason.into(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
