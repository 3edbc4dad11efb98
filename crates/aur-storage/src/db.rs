//! RocksDB backend

use crate::error::{StorageError, StorageResult};
use crate::traits::{BatchOp, Entries, KvStore, ReadView, Table, WriteBatch};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode, MultiThreaded,
    Options, SnapshotWithThreadMode, WriteOptions,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

type RocksDB = DBWithThreadMode<MultiThreaded>;

/// Store configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database directory
    pub path: PathBuf,
    /// Create database if missing
    pub create_if_missing: bool,
    /// fsync every commit
    pub sync_writes: bool,
    /// Maximum number of open files
    pub max_open_files: i32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/ledger"),
            create_if_missing: true,
            sync_writes: true,
            max_open_files: 512,
        }
    }
}

impl StoreConfig {
    /// Config for a database at `path`, other settings default
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// RocksDB store with one column family per [`Table`]
pub struct RocksStore {
    db: RocksDB,
    sync_writes: bool,
    path: PathBuf,
}

impl RocksStore {
    /// Open the database
    pub fn open(config: &StoreConfig) -> StorageResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(config.max_open_files);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = Table::ALL
            .iter()
            .map(|table| ColumnFamilyDescriptor::new(table.name(), Options::default()))
            .collect();

        let db = RocksDB::open_cf_descriptors(&opts, &config.path, cf_descriptors)?;
        info!(path = %config.path.display(), sync = config.sync_writes, "opened ledger store");
        Ok(Self {
            db,
            sync_writes: config.sync_writes,
            path: config.path.clone(),
        })
    }

    /// Get database path
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

fn cf_handle<'a>(db: &'a RocksDB, table: Table) -> StorageResult<Arc<BoundColumnFamily<'a>>> {
    db.cf_handle(table.name())
        .ok_or_else(|| StorageError::InvalidColumnFamily(table.name().to_string()))
}

impl KvStore for RocksStore {
    fn snapshot(&self) -> Box<dyn ReadView + '_> {
        Box::new(RocksSnapshot {
            db: &self.db,
            snapshot: self.db.snapshot(),
        })
    }

    fn commit(&self, batch: WriteBatch) -> StorageResult<()> {
        let mut rocks_batch = rocksdb::WriteBatch::default();
        for op in batch.into_operations() {
            match op {
                BatchOp::Put { table, key, value } => {
                    let cf = cf_handle(&self.db, table)?;
                    rocks_batch.put_cf(&cf, &key, &value);
                }
                BatchOp::Delete { table, key } => {
                    let cf = cf_handle(&self.db, table)?;
                    rocks_batch.delete_cf(&cf, &key);
                }
            }
        }

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        self.db.write_opt(rocks_batch, &write_opts)?;
        Ok(())
    }
}

struct RocksSnapshot<'a> {
    db: &'a RocksDB,
    snapshot: SnapshotWithThreadMode<'a, RocksDB>,
}

impl ReadView for RocksSnapshot<'_> {
    fn get(&self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let cf = cf_handle(self.db, table)?;
        Ok(self.snapshot.get_cf(&cf, key)?)
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8], limit: Option<usize>) -> StorageResult<Entries> {
        let cf = cf_handle(self.db, table)?;
        let mut out = Vec::new();
        for item in self
            .snapshot
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward))
        {
            if limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.into_vec(), value.into_vec()));
        }
        Ok(out)
    }
}
