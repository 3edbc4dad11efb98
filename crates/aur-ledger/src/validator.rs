//! Block validation
//!
//! The `check_*` functions are pure. [`check_block`] runs them in order
//! against a supplied view and is shared by the read-only pre-check and the
//! authoritative re-check inside the write transaction, so both phases apply
//! exactly the same rules.

use crate::result::InsertResult;
use aur_crypto::verify;
use aur_primitives::{Amount, PublicKey, H256};
use aur_storage::{StateReader, StorageResult};
use aur_types::{AccountState, Block, PendingKey};

/// Either a value or the rejection code
pub type Verdict<T> = Result<T, InsertResult>;

/// What a block that passed every check will change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Checked {
    /// Debit `source`, create a pending entry
    Send {
        /// Source state before the block
        source: AccountState,
    },
    /// Consume the pending entry, credit the recipient
    Receive {
        /// Recipient state before the block (default if new)
        recipient: AccountState,
        /// Pending amount being claimed
        amount: Amount,
    },
    /// Bootstrap credit straight to the recipient
    Genesis {
        /// Recipient state before the block (default if new)
        recipient: AccountState,
    },
}

/// Verify the trailing signature against the key of the chain being extended
pub fn verify_signature(block: &Block, hash: &H256) -> Verdict<()> {
    verify(hash, block.signature(), &block.signer()).map_err(|_| InsertResult::BadSignature)
}

/// The declared previous must equal the current head exactly
pub fn check_frontier(state: &AccountState, declared_previous: &H256) -> Verdict<()> {
    if state.head == *declared_previous {
        Ok(())
    } else {
        Err(InsertResult::BadFrontier)
    }
}

/// A send may not move more than the balance
pub fn check_balance(state: &AccountState, amount: Amount) -> Verdict<()> {
    if amount > state.balance {
        Err(InsertResult::InsufficientFunds)
    } else {
        Ok(())
    }
}

/// A receive must claim an existing pending entry
pub fn check_pending_exists(pending: Option<Amount>) -> Verdict<Amount> {
    pending.ok_or(InsertResult::PendingNotFound)
}

/// Run every state check for `block` against `view`.
///
/// With `bypass`, a send skips the source checks and becomes a genesis
/// credit; it still has to extend the recipient's chain, so a second
/// genesis never credits an existing account. The duplicate check always
/// runs.
pub fn check_block<R>(view: &R, block: &Block, hash: &H256, bypass: bool) -> StorageResult<Verdict<Checked>>
where
    R: StateReader + ?Sized,
{
    if view.contains_block(hash)? {
        return Ok(Err(InsertResult::Duplicate));
    }

    Ok(match block {
        Block::Send(send) if bypass => {
            let recipient = account_or_default(view, &send.recipient)?;
            check_frontier(&recipient, &send.previous).map(|_| Checked::Genesis { recipient })
        }
        Block::Send(send) => match view.get_account(&send.source)? {
            None => Err(InsertResult::AccountNotFound),
            Some(source) => check_frontier(&source, &send.previous)
                .and_then(|_| check_balance(&source, send.amount))
                .map(|_| Checked::Send { source }),
        },
        Block::Receive(receive) => {
            let pending = view.get_pending(&PendingKey::new(receive.recipient, receive.claimed_hash))?;
            let recipient = account_or_default(view, &receive.recipient)?;
            check_pending_exists(pending).and_then(|amount| {
                check_frontier(&recipient, &receive.previous).map(|_| Checked::Receive { recipient, amount })
            })
        }
    })
}

fn account_or_default<R>(view: &R, account: &PublicKey) -> StorageResult<AccountState>
where
    R: StateReader + ?Sized,
{
    Ok(view.get_account(account)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aur_crypto::Keypair;
    use aur_storage::StateStore;
    use aur_types::{ReceiveBlock, SendBlock};

    fn seeded(store: &StateStore, account: &PublicKey, state: AccountState) {
        let mut txn = store.begin_write();
        txn.put_account(account, &state);
        txn.commit().unwrap();
    }

    // ==================== Pure checks ====================

    #[test]
    fn test_frontier() {
        let state = AccountState::new(10, H256::from_bytes([1u8; 32]));
        assert!(check_frontier(&state, &H256::from_bytes([1u8; 32])).is_ok());
        assert_eq!(check_frontier(&state, &H256::ZERO), Err(InsertResult::BadFrontier));
        assert!(check_frontier(&AccountState::default(), &H256::ZERO).is_ok());
    }

    #[test]
    fn test_balance() {
        let state = AccountState::new(10, H256::ZERO);
        assert!(check_balance(&state, 10).is_ok());
        assert!(check_balance(&state, 0).is_ok());
        assert_eq!(check_balance(&state, 11), Err(InsertResult::InsufficientFunds));
    }

    #[test]
    fn test_pending_exists() {
        assert_eq!(check_pending_exists(Some(5)), Ok(5));
        assert_eq!(check_pending_exists(None), Err(InsertResult::PendingNotFound));
    }

    #[test]
    fn test_signature_checks_signer() {
        let sender = Keypair::from_seed([1u8; 32]);
        let recipient = Keypair::from_seed([2u8; 32]);

        let send: Block = SendBlock::new(sender.public_key(), recipient.public_key(), 1, H256::ZERO, 0)
            .signed(&sender)
            .into();
        assert!(verify_signature(&send, &send.hash()).is_ok());

        // a receive must be signed by the recipient, not the sender
        let receive: Block = ReceiveBlock::new(recipient.public_key(), send.hash(), H256::ZERO, 0)
            .signed(&sender)
            .into();
        assert_eq!(verify_signature(&receive, &receive.hash()), Err(InsertResult::BadSignature));
    }

    // ==================== check_block ====================

    #[test]
    fn test_send_checks_in_order() {
        let store = StateStore::in_memory();
        let source = PublicKey::from_bytes([1u8; 32]);
        let head = H256::from_bytes([7u8; 32]);
        let send = |amount, previous| -> Block {
            SendBlock::new(source, PublicKey::from_bytes([2u8; 32]), amount, previous, 0).into()
        };

        let block = send(5, head);
        let verdict = check_block(&store.begin_read(), &block, &block.hash(), false).unwrap();
        assert_eq!(verdict, Err(InsertResult::AccountNotFound));

        seeded(&store, &source, AccountState::new(10, head));
        let view = store.begin_read();

        let stale = send(5, H256::ZERO);
        assert_eq!(
            check_block(&view, &stale, &stale.hash(), false).unwrap(),
            Err(InsertResult::BadFrontier)
        );

        let greedy = send(11, head);
        assert_eq!(
            check_block(&view, &greedy, &greedy.hash(), false).unwrap(),
            Err(InsertResult::InsufficientFunds)
        );

        assert_eq!(
            check_block(&view, &block, &block.hash(), false).unwrap(),
            Ok(Checked::Send {
                source: AccountState::new(10, head)
            })
        );
    }

    #[test]
    fn test_duplicate_checked_first() {
        let store = StateStore::in_memory();
        let block: Block = SendBlock::new(PublicKey::NULL, PublicKey::from_bytes([2u8; 32]), 1, H256::ZERO, 0).into();
        let mut txn = store.begin_write();
        txn.put_block(&block.hash(), &block.encode());
        txn.commit().unwrap();

        let view = store.begin_read();
        assert_eq!(
            check_block(&view, &block, &block.hash(), true).unwrap(),
            Err(InsertResult::Duplicate)
        );
        assert_eq!(
            check_block(&view, &block, &block.hash(), false).unwrap(),
            Err(InsertResult::Duplicate)
        );
    }

    #[test]
    fn test_bypass_send_is_genesis() {
        let store = StateStore::in_memory();
        let block: Block = SendBlock::new(PublicKey::NULL, PublicKey::from_bytes([2u8; 32]), 1, H256::ZERO, 0).into();
        assert_eq!(
            check_block(&store.begin_read(), &block, &block.hash(), true).unwrap(),
            Ok(Checked::Genesis {
                recipient: AccountState::default()
            })
        );
    }

    #[test]
    fn test_bypass_send_needs_fresh_recipient() {
        let store = StateStore::in_memory();
        let recipient = PublicKey::from_bytes([2u8; 32]);
        seeded(&store, &recipient, AccountState::new(100, H256::from_bytes([6u8; 32])));

        let block: Block = SendBlock::new(PublicKey::NULL, recipient, 1, H256::ZERO, 5).into();
        assert_eq!(
            check_block(&store.begin_read(), &block, &block.hash(), true).unwrap(),
            Err(InsertResult::BadFrontier)
        );
    }

    #[test]
    fn test_receive_checks() {
        let store = StateStore::in_memory();
        let recipient = PublicKey::from_bytes([3u8; 32]);
        let claimed = H256::from_bytes([9u8; 32]);
        let receive: Block = ReceiveBlock::new(recipient, claimed, H256::ZERO, 0).into();

        assert_eq!(
            check_block(&store.begin_read(), &receive, &receive.hash(), false).unwrap(),
            Err(InsertResult::PendingNotFound)
        );

        let mut txn = store.begin_write();
        txn.put_pending(&PendingKey::new(recipient, claimed), 40);
        txn.commit().unwrap();
        assert_eq!(
            check_block(&store.begin_read(), &receive, &receive.hash(), false).unwrap(),
            Ok(Checked::Receive {
                recipient: AccountState::default(),
                amount: 40
            })
        );

        seeded(&store, &recipient, AccountState::new(1, H256::from_bytes([4u8; 32])));
        assert_eq!(
            check_block(&store.begin_read(), &receive, &receive.hash(), false).unwrap(),
            Err(InsertResult::BadFrontier)
        );
    }
}
