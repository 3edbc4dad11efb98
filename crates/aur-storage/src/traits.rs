//! Storage traits for ledger state access

use crate::error::{StorageError, StorageResult};
use aur_primitives::{Amount, PublicKey, H256};
use aur_types::{decode_amount, AccountState, PendingKey, PendingTransfer};
use std::fmt;

/// Ledger tables
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    /// Block hash -> encoded block (write-once)
    Blocks,
    /// Public key -> encoded `AccountState`
    Accounts,
    /// `PendingKey` -> encoded amount
    Pending,
}

impl Table {
    /// Every table, in column family order
    pub const ALL: [Table; 3] = [Table::Blocks, Table::Accounts, Table::Pending];

    /// Column family name
    pub fn name(self) -> &'static str {
        match self {
            Table::Blocks => "blocks",
            Table::Accounts => "accounts",
            Table::Pending => "pending",
        }
    }

    /// Dense index, used by backends that keep tables in an array
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key/value pairs returned by a scan
pub type Entries = Vec<(Vec<u8>, Vec<u8>)>;

/// Consistent read-only view of the store
pub trait ReadView {
    /// Get a value
    fn get(&self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Entries whose key starts with `prefix`, in ascending key order
    fn scan_prefix(&self, table: Table, prefix: &[u8], limit: Option<usize>) -> StorageResult<Entries>;
}

/// Transactional key-value substrate
pub trait KvStore: Send + Sync + 'static {
    /// Open a point-in-time snapshot; later commits are not visible through it
    fn snapshot(&self) -> Box<dyn ReadView + '_>;

    /// Apply a batch atomically
    fn commit(&self, batch: WriteBatch) -> StorageResult<()>;
}

/// Batch operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or overwrite
    Put {
        /// Target table
        table: Table,
        /// Key
        key: Vec<u8>,
        /// Value
        value: Vec<u8>,
    },
    /// Remove
    Delete {
        /// Target table
        table: Table,
        /// Key
        key: Vec<u8>,
    },
}

/// Ordered set of writes applied as one unit
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    operations: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create a new write batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a put operation
    pub fn put(&mut self, table: Table, key: &[u8], value: &[u8]) {
        self.operations.push(BatchOp::Put {
            table,
            key: key.to_vec(),
            value: value.to_vec(),
        });
    }

    /// Add a delete operation
    pub fn delete(&mut self, table: Table, key: &[u8]) {
        self.operations.push(BatchOp::Delete {
            table,
            key: key.to_vec(),
        });
    }

    /// Get number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if batch is empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Consume into operations, in insertion order
    pub fn into_operations(self) -> Vec<BatchOp> {
        self.operations
    }
}

/// Typed ledger reads over any view
pub trait StateReader: ReadView {
    /// Encoded block by hash
    fn get_block(&self, hash: &H256) -> StorageResult<Option<Vec<u8>>> {
        self.get(Table::Blocks, hash.as_bytes())
    }

    /// Check whether a block hash is stored
    fn contains_block(&self, hash: &H256) -> StorageResult<bool> {
        Ok(self.get_block(hash)?.is_some())
    }

    /// Account state, `None` if the account has no applied blocks
    fn get_account(&self, account: &PublicKey) -> StorageResult<Option<AccountState>> {
        match self.get(Table::Accounts, account.as_bytes())? {
            Some(bytes) => AccountState::from_bytes(&bytes)
                .map(Some)
                .ok_or_else(|| StorageError::corrupt(Table::Accounts, format!("account {}", account))),
            None => Ok(None),
        }
    }

    /// Pending amount for one key
    fn get_pending(&self, key: &PendingKey) -> StorageResult<Option<Amount>> {
        match self.get(Table::Pending, &key.to_bytes())? {
            Some(bytes) => decode_amount(&bytes)
                .map(Some)
                .ok_or_else(|| StorageError::corrupt(Table::Pending, format!("amount for {}", key.send_hash))),
            None => Ok(None),
        }
    }

    /// Pending transfers owed to `recipient`, ordered by send hash
    fn pending_for(&self, recipient: &PublicKey, limit: Option<usize>) -> StorageResult<Vec<PendingTransfer>> {
        decode_pending(self.scan_prefix(Table::Pending, &PendingKey::prefix(recipient), limit)?)
    }

    /// Every account with its state, ordered by key
    fn accounts(&self) -> StorageResult<Vec<(PublicKey, AccountState)>> {
        self.scan_prefix(Table::Accounts, &[], None)?
            .into_iter()
            .map(|(key, value)| {
                let account = PublicKey::from_slice(&key)
                    .map_err(|e| StorageError::corrupt(Table::Accounts, e.to_string()))?;
                let state = AccountState::from_bytes(&value)
                    .ok_or_else(|| StorageError::corrupt(Table::Accounts, format!("account {}", account)))?;
                Ok((account, state))
            })
            .collect()
    }

    /// Every pending transfer, ordered by key
    fn all_pending(&self) -> StorageResult<Vec<PendingTransfer>> {
        decode_pending(self.scan_prefix(Table::Pending, &[], None)?)
    }
}

impl<T: ReadView + ?Sized> StateReader for T {}

fn decode_pending(entries: Entries) -> StorageResult<Vec<PendingTransfer>> {
    entries
        .into_iter()
        .map(|(key, value)| {
            let key = PendingKey::from_bytes(&key)
                .ok_or_else(|| StorageError::corrupt(Table::Pending, "pending key length"))?;
            let amount = decode_amount(&value)
                .ok_or_else(|| StorageError::corrupt(Table::Pending, format!("amount for {}", key.send_hash)))?;
            Ok(PendingTransfer {
                recipient: key.recipient,
                send_hash: key.send_hash,
                amount,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        let names: Vec<_> = Table::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["blocks", "accounts", "pending"]);
        for (i, table) in Table::ALL.iter().enumerate() {
            assert_eq!(table.index(), i);
        }
    }

    #[test]
    fn test_write_batch() {
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());
        batch.put(Table::Accounts, b"a", b"1");
        batch.delete(Table::Pending, b"p");
        assert_eq!(batch.len(), 2);

        let ops = batch.into_operations();
        assert_eq!(
            ops[1],
            BatchOp::Delete {
                table: Table::Pending,
                key: b"p".to_vec()
            }
        );
    }
}
