//! In-memory backend
//!
//! Tables live behind an `Arc`; a snapshot is a clone of that `Arc` and a
//! commit copies-on-write only while snapshots are outstanding.

use crate::error::StorageResult;
use crate::traits::{BatchOp, Entries, KvStore, ReadView, Table, WriteBatch};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

type Tables = [BTreeMap<Vec<u8>, Vec<u8>>; 3];

/// Volatile store for tests and tooling
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Arc<Tables>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn snapshot(&self) -> Box<dyn ReadView + '_> {
        Box::new(MemorySnapshot {
            tables: Arc::clone(&*self.tables.read()),
        })
    }

    fn commit(&self, batch: WriteBatch) -> StorageResult<()> {
        let mut guard = self.tables.write();
        let tables = Arc::make_mut(&mut *guard);
        for op in batch.into_operations() {
            match op {
                BatchOp::Put { table, key, value } => {
                    tables[table.index()].insert(key, value);
                }
                BatchOp::Delete { table, key } => {
                    tables[table.index()].remove(&key);
                }
            }
        }
        Ok(())
    }
}

struct MemorySnapshot {
    tables: Arc<Tables>,
}

impl ReadView for MemorySnapshot {
    fn get(&self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.tables[table.index()].get(key).cloned())
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8], limit: Option<usize>) -> StorageResult<Entries> {
        let iter = self.tables[table.index()]
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()));
        Ok(match limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        })
    }
}
