//! # aur-storage
//!
//! Storage layer for the Aurium ledger.
//!
//! This crate provides:
//! - Key-value substrate abstraction ([`KvStore`], [`ReadView`])
//! - RocksDB backend with one column family per table
//! - In-memory backend for tests and tooling
//! - Snapshot reads and a single write transaction with a read-your-writes overlay

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod db;
pub mod error;
pub mod memory;
pub mod state;
pub mod traits;

pub use db::{RocksStore, StoreConfig};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use state::{ReadTxn, StateStore, WriteTxn};
pub use traits::{KvStore, ReadView, StateReader, Table, WriteBatch};
