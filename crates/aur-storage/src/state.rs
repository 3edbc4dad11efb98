//! Transactional state store
//!
//! Any number of [`ReadTxn`] snapshots may be open at once. At most one
//! [`WriteTxn`] is live: it holds the writer lock from `begin_write` until it
//! is committed or dropped. Writes are buffered in an overlay that the
//! transaction itself reads through, and reach the backend as one batch.

use crate::db::{RocksStore, StoreConfig};
use crate::error::StorageResult;
use crate::memory::MemoryStore;
use crate::traits::{Entries, KvStore, ReadView, Table, WriteBatch};
use aur_primitives::{Amount, PublicKey, H256};
use aur_types::{encode_amount, AccountState, PendingKey};
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use tracing::trace;

/// Ledger state store over a [`KvStore`] backend
pub struct StateStore {
    kv: Box<dyn KvStore>,
    writer: Mutex<()>,
}

impl StateStore {
    /// Wrap a backend
    pub fn new(kv: impl KvStore) -> Self {
        Self {
            kv: Box::new(kv),
            writer: Mutex::new(()),
        }
    }

    /// Open a RocksDB-backed store
    pub fn open(config: &StoreConfig) -> StorageResult<Self> {
        Ok(Self::new(RocksStore::open(config)?))
    }

    /// Create a volatile in-memory store
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Open a read-only snapshot
    pub fn begin_read(&self) -> ReadTxn<'_> {
        ReadTxn {
            view: self.kv.snapshot(),
        }
    }

    /// Open the write transaction, blocking while another is live
    pub fn begin_write(&self) -> WriteTxn<'_> {
        let guard = self.writer.lock();
        WriteTxn::new(self, guard)
    }
}

/// Read-only snapshot
pub struct ReadTxn<'a> {
    view: Box<dyn ReadView + 'a>,
}

impl ReadView for ReadTxn<'_> {
    fn get(&self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        self.view.get(table, key)
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8], limit: Option<usize>) -> StorageResult<Entries> {
        self.view.scan_prefix(table, prefix, limit)
    }
}

/// The single live write transaction
pub struct WriteTxn<'a> {
    store: &'a StateStore,
    _guard: MutexGuard<'a, ()>,
    base: Box<dyn ReadView + 'a>,
    /// None = deleted
    overlay: BTreeMap<(Table, Vec<u8>), Option<Vec<u8>>>,
}

impl<'a> WriteTxn<'a> {
    fn new(store: &'a StateStore, guard: MutexGuard<'a, ()>) -> Self {
        // snapshot taken under the lock so it includes every prior commit
        Self {
            store,
            _guard: guard,
            base: store.kv.snapshot(),
            overlay: BTreeMap::new(),
        }
    }

    /// Buffer a put
    pub fn put(&mut self, table: Table, key: &[u8], value: &[u8]) {
        self.overlay.insert((table, key.to_vec()), Some(value.to_vec()));
    }

    /// Buffer a delete
    pub fn delete(&mut self, table: Table, key: &[u8]) {
        self.overlay.insert((table, key.to_vec()), None);
    }

    /// Store an encoded block under its hash
    pub fn put_block(&mut self, hash: &H256, bytes: &[u8]) {
        self.put(Table::Blocks, hash.as_bytes(), bytes);
    }

    /// Store an account state
    pub fn put_account(&mut self, account: &PublicKey, state: &AccountState) {
        self.put(Table::Accounts, account.as_bytes(), &state.to_bytes());
    }

    /// Store a pending transfer
    pub fn put_pending(&mut self, key: &PendingKey, amount: Amount) {
        self.put(Table::Pending, &key.to_bytes(), &encode_amount(amount));
    }

    /// Remove a pending transfer
    pub fn delete_pending(&mut self, key: &PendingKey) {
        self.delete(Table::Pending, &key.to_bytes());
    }

    /// Number of buffered writes
    pub fn len(&self) -> usize {
        self.overlay.len()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.overlay.is_empty()
    }

    /// Apply every buffered write atomically and release the writer lock
    pub fn commit(self) -> StorageResult<()> {
        let mut batch = WriteBatch::new();
        for ((table, key), value) in &self.overlay {
            match value {
                Some(value) => batch.put(*table, key, value),
                None => batch.delete(*table, key),
            }
        }
        trace!(writes = batch.len(), "committing write transaction");
        self.store.kv.commit(batch)
    }

    /// Discard every buffered write and release the writer lock
    pub fn abort(self) {
        trace!(writes = self.overlay.len(), "aborting write transaction");
    }
}

impl ReadView for WriteTxn<'_> {
    fn get(&self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        match self.overlay.get(&(table, key.to_vec())) {
            Some(value) => Ok(value.clone()),
            None => self.base.get(table, key),
        }
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8], limit: Option<usize>) -> StorageResult<Entries> {
        // deletes in the overlay may remove base rows, so the base is scanned unbounded
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.scan_prefix(table, prefix, None)?.into_iter().collect();
        let pending = self
            .overlay
            .range((table, prefix.to_vec())..)
            .take_while(|((t, key), _)| *t == table && key.starts_with(prefix));
        for ((_, key), value) in pending {
            match value {
                Some(value) => merged.insert(key.clone(), value.clone()),
                None => merged.remove(key),
            };
        }
        let iter = merged.into_iter();
        Ok(match limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::traits::StateReader;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    fn key(n: u8) -> PublicKey {
        PublicKey::from_bytes([n; 32])
    }

    fn hash(n: u8) -> H256 {
        H256::from_bytes([n; 32])
    }

    // ==================== Transactions ====================

    #[test]
    fn test_read_your_writes() {
        let store = StateStore::in_memory();
        let mut txn = store.begin_write();
        let state = AccountState::new(10, hash(1));
        txn.put_account(&key(1), &state);

        assert_eq!(txn.get_account(&key(1)).unwrap(), Some(state));
        // not visible outside until commit
        assert_eq!(store.begin_read().get_account(&key(1)).unwrap(), None);

        txn.commit().unwrap();
        assert_eq!(store.begin_read().get_account(&key(1)).unwrap(), Some(state));
    }

    #[test]
    fn test_abort_discards() {
        let store = StateStore::in_memory();
        let mut txn = store.begin_write();
        txn.put_block(&hash(1), b"block");
        assert_eq!(txn.len(), 1);
        txn.abort();

        assert!(!store.begin_read().contains_block(&hash(1)).unwrap());
        assert!(store.begin_write().is_empty());
    }

    #[test]
    fn test_single_writer() {
        let store = StateStore::in_memory();
        let entered = AtomicBool::new(false);
        let txn = store.begin_write();

        thread::scope(|s| {
            let second = s.spawn(|| {
                let _txn = store.begin_write();
                entered.store(true, Ordering::SeqCst);
            });
            thread::sleep(Duration::from_millis(50));
            assert!(!entered.load(Ordering::SeqCst));

            drop(txn);
            second.join().unwrap();
        });
        assert!(entered.load(Ordering::SeqCst));
    }

    #[test]
    fn test_reader_snapshot_isolated_from_commit() {
        let store = StateStore::in_memory();
        let reader = store.begin_read();

        let mut txn = store.begin_write();
        txn.put_account(&key(2), &AccountState::new(5, hash(9)));
        txn.commit().unwrap();

        assert_eq!(reader.get_account(&key(2)).unwrap(), None);
        assert!(store.begin_read().get_account(&key(2)).unwrap().is_some());
    }

    #[test]
    fn test_writer_sees_previous_commit() {
        let store = StateStore::in_memory();
        let mut first = store.begin_write();
        first.put_pending(&PendingKey::new(key(1), hash(1)), 7);
        first.commit().unwrap();

        let second = store.begin_write();
        assert_eq!(second.get_pending(&PendingKey::new(key(1), hash(1))).unwrap(), Some(7));
    }

    // ==================== Pending scans ====================

    #[test]
    fn test_pending_for_orders_by_hash() {
        let store = StateStore::in_memory();
        let mut txn = store.begin_write();
        txn.put_pending(&PendingKey::new(key(1), hash(0xc0)), 3);
        txn.put_pending(&PendingKey::new(key(1), hash(0x10)), 1);
        txn.put_pending(&PendingKey::new(key(1), hash(0x80)), 2);
        txn.put_pending(&PendingKey::new(key(2), hash(0x00)), 9);
        txn.commit().unwrap();

        let reader = store.begin_read();
        let pending = reader.pending_for(&key(1), None).unwrap();
        let amounts: Vec<_> = pending.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![1, 2, 3]);
        assert_eq!(reader.pending_for(&key(1), Some(2)).unwrap().len(), 2);
        assert_eq!(reader.all_pending().unwrap().len(), 4);
    }

    #[test]
    fn test_overlay_scan_merges_deletes() {
        let store = StateStore::in_memory();
        let mut txn = store.begin_write();
        txn.put_pending(&PendingKey::new(key(1), hash(1)), 1);
        txn.put_pending(&PendingKey::new(key(1), hash(2)), 2);
        txn.commit().unwrap();

        let mut txn = store.begin_write();
        txn.delete_pending(&PendingKey::new(key(1), hash(1)));
        txn.put_pending(&PendingKey::new(key(1), hash(3)), 3);
        let amounts: Vec<_> = txn
            .pending_for(&key(1), Some(5))
            .unwrap()
            .iter()
            .map(|p| p.amount)
            .collect();
        assert_eq!(amounts, vec![2, 3]);
        assert_eq!(txn.pending_for(&key(1), Some(1)).unwrap()[0].amount, 2);
    }

    #[test]
    fn test_accounts_listing() {
        let store = StateStore::in_memory();
        let mut txn = store.begin_write();
        txn.put_account(&key(3), &AccountState::new(3, hash(3)));
        txn.put_account(&key(1), &AccountState::new(1, hash(1)));
        txn.commit().unwrap();

        let accounts = store.begin_read().accounts().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].0, key(1));
        assert_eq!(accounts[1].1.balance, 3);
    }

    // ==================== Corruption ====================

    #[test]
    fn test_corrupt_account_record() {
        let store = StateStore::in_memory();
        let mut txn = store.begin_write();
        txn.put(Table::Accounts, key(1).as_bytes(), b"short");
        txn.commit().unwrap();

        let result = store.begin_read().get_account(&key(1));
        assert!(matches!(
            result,
            Err(StorageError::Corrupt {
                table: Table::Accounts,
                ..
            })
        ));
    }

    #[test]
    fn test_corrupt_pending_amount() {
        let store = StateStore::in_memory();
        let pending_key = PendingKey::new(key(1), hash(1));
        let mut txn = store.begin_write();
        txn.put(Table::Pending, &pending_key.to_bytes(), &[1, 2, 3]);
        txn.commit().unwrap();

        assert!(store.begin_read().get_pending(&pending_key).is_err());
        assert!(store.begin_read().pending_for(&key(1), None).is_err());
    }
}
