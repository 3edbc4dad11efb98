//! State store tests against the RocksDB backend

use aur_primitives::{PublicKey, H256};
use aur_storage::{StateReader, StateStore, StoreConfig};
use aur_types::{AccountState, PendingKey};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn open(dir: &TempDir) -> StateStore {
    StateStore::open(&StoreConfig::at(dir.path())).unwrap()
}

#[test]
fn test_commit_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let account = PublicKey::from_bytes([1u8; 32]);
    let send_hash = H256::from_bytes([2u8; 32]);
    {
        let store = open(&dir);
        let mut txn = store.begin_write();
        txn.put_block(&send_hash, &[0u8; 201]);
        txn.put_account(&account, &AccountState::new(100, send_hash));
        txn.put_pending(&PendingKey::new(account, send_hash), 25);
        txn.commit().unwrap();
    }

    let store = open(&dir);
    let reader = store.begin_read();
    assert!(reader.contains_block(&send_hash).unwrap());
    assert_eq!(reader.get_account(&account).unwrap(), Some(AccountState::new(100, send_hash)));
    assert_eq!(reader.get_pending(&PendingKey::new(account, send_hash)).unwrap(), Some(25));
}

#[test]
fn test_aborted_write_not_persisted() {
    let dir = TempDir::new().unwrap();
    let hash = H256::from_bytes([3u8; 32]);
    {
        let store = open(&dir);
        let mut txn = store.begin_write();
        txn.put_block(&hash, b"never");
        txn.abort();
    }
    assert!(!open(&dir).begin_read().contains_block(&hash).unwrap());
}

#[test]
fn test_readers_do_not_block_writer() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open(&dir));
    let account = PublicKey::from_bytes([4u8; 32]);

    let reader = store.begin_read();
    let writer_store = Arc::clone(&store);
    thread::spawn(move || {
        let mut txn = writer_store.begin_write();
        txn.put_account(&account, &AccountState::new(1, H256::ZERO));
        txn.commit().unwrap();
    })
    .join()
    .unwrap();

    // snapshot opened before the commit
    assert_eq!(reader.get_account(&account).unwrap(), None);
    assert_eq!(store.begin_read().get_account(&account).unwrap().map(|s| s.balance), Some(1));
}

#[test]
fn test_delete_pending_persists() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let key = PendingKey::new(PublicKey::from_bytes([5u8; 32]), H256::from_bytes([6u8; 32]));

    let mut txn = store.begin_write();
    txn.put_pending(&key, 9);
    txn.commit().unwrap();

    let mut txn = store.begin_write();
    txn.delete_pending(&key);
    txn.commit().unwrap();

    assert_eq!(store.begin_read().get_pending(&key).unwrap(), None);
    assert!(store.begin_read().all_pending().unwrap().is_empty());
}
