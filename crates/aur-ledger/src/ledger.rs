//! Ledger facade
//!
//! Block insertion runs in two phases. Phase A decodes the block, verifies
//! its signature and runs the state checks against a read snapshot; it is a
//! cheap filter and not authoritative. Blocks that pass are queued on the
//! write serializer, where Phase B repeats the state checks inside the write
//! transaction and applies the block only if they still hold.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::events::{EventBus, LedgerEvent, Subscriber};
use crate::result::InsertResult;
use crate::serializer::{WriteHandler, WriteQueue};
use crate::validator::{check_block, verify_signature, Checked};
use aur_primitives::{Amount, PublicKey, H256};
use aur_storage::{StateReader, StateStore, StorageError, Table, WriteTxn};
use aur_types::{canonical_hash, decode, AccountState, Block, PendingKey, PendingTransfer};
use bytes::Bytes;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Block queued for Phase B
struct WriteJob {
    block: Block,
    hash: H256,
    raw: Bytes,
    bypass: bool,
}

/// Phase B, running on the writer thread
struct Applier {
    store: Arc<StateStore>,
    events: Arc<EventBus>,
}

impl WriteHandler for Applier {
    type Job = WriteJob;
    type Output = InsertResult;

    fn handle(&mut self, job: WriteJob) -> LedgerResult<InsertResult> {
        let mut txn = self.store.begin_write();
        let checked = match check_block(&txn, &job.block, &job.hash, job.bypass)? {
            Ok(checked) => checked,
            Err(result) => {
                txn.abort();
                warn!(hash = %job.hash, result = %result, "block rejected on apply");
                return Ok(result);
            }
        };

        let events = apply(&mut txn, &job, checked)?;
        txn.commit()?;
        debug!(hash = %job.hash, kind = %job.block.kind(), "block committed");

        self.events.dispatch(&events);
        Ok(InsertResult::Success)
    }
}

/// Write the effects of a checked block and return the events it raises
fn apply(txn: &mut WriteTxn<'_>, job: &WriteJob, checked: Checked) -> LedgerResult<Vec<LedgerEvent>> {
    let mut events = Vec::with_capacity(3);
    match (&job.block, checked) {
        (Block::Send(send), Checked::Send { source }) => {
            let state = AccountState::new(debit(source.balance, send.amount)?, job.hash);
            txn.put_account(&send.source, &state);
            let pending = PendingTransfer {
                recipient: send.recipient,
                send_hash: job.hash,
                amount: send.amount,
            };
            txn.put_pending(&pending.key(), pending.amount);
            events.push(LedgerEvent::Pending(pending));
            events.push(LedgerEvent::AccountState {
                account: send.source,
                state,
            });
        }
        (Block::Receive(receive), Checked::Receive { recipient, amount }) => {
            txn.delete_pending(&PendingKey::new(receive.recipient, receive.claimed_hash));
            let state = AccountState::new(credit(recipient.balance, amount)?, job.hash);
            txn.put_account(&receive.recipient, &state);
            events.push(LedgerEvent::AccountState {
                account: receive.recipient,
                state,
            });
        }
        (Block::Send(send), Checked::Genesis { recipient }) => {
            let state = AccountState::new(credit(recipient.balance, send.amount)?, job.hash);
            txn.put_account(&send.recipient, &state);
            events.push(LedgerEvent::AccountState {
                account: send.recipient,
                state,
            });
        }
        (block, checked) => {
            return Err(StorageError::corrupt(
                Table::Blocks,
                format!("{} block checked as {:?}", block.kind(), checked),
            )
            .into());
        }
    }

    txn.put_block(&job.hash, &job.raw);
    events.push(LedgerEvent::BlockInserted {
        hash: job.hash,
        block: job.raw.clone(),
    });
    Ok(events)
}

fn credit(balance: Amount, amount: Amount) -> LedgerResult<Amount> {
    balance
        .checked_add(amount)
        .ok_or_else(|| StorageError::Overflow(format!("credit {} to balance {}", amount, balance)).into())
}

fn debit(balance: Amount, amount: Amount) -> LedgerResult<Amount> {
    balance
        .checked_sub(amount)
        .ok_or_else(|| StorageError::Overflow(format!("debit {} from balance {}", amount, balance)).into())
}

/// Phase A verdict
#[derive(Debug)]
pub enum Submission {
    /// Rejected before queueing
    Rejected(InsertResult),
    /// Queued; resolves to the authoritative result
    Queued(PendingInsert),
}

impl Submission {
    /// Wait for the final result
    pub async fn result(self) -> LedgerResult<InsertResult> {
        match self {
            Submission::Rejected(result) => Ok(result),
            Submission::Queued(pending) => pending.await,
        }
    }
}

/// Result of a queued insertion
#[derive(Debug)]
pub struct PendingInsert {
    hash: H256,
    rx: oneshot::Receiver<LedgerResult<InsertResult>>,
}

impl PendingInsert {
    /// Hash of the queued block
    pub fn hash(&self) -> H256 {
        self.hash
    }
}

impl Future for PendingInsert {
    type Output = LedgerResult<InsertResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|reply| match reply {
            Ok(result) => result,
            Err(_) => Err(LedgerError::QueueClosed),
        })
    }
}

/// The ledger engine
pub struct Ledger {
    store: Arc<StateStore>,
    events: Arc<EventBus>,
    queue: WriteQueue<Applier>,
    config: LedgerConfig,
}

impl Ledger {
    /// Open a ledger over `store` and start its writer
    pub fn open(store: Arc<StateStore>, config: LedgerConfig) -> LedgerResult<Self> {
        config.genesis.account()?;
        let events = Arc::new(EventBus::new());
        let applier = Applier {
            store: Arc::clone(&store),
            events: Arc::clone(&events),
        };
        let queue = WriteQueue::spawn("ledger-writer", applier, config.queue_depth, config.admission_timeout())?;
        info!(queue_depth = config.queue_depth, "ledger opened");

        Ok(Self {
            store,
            events,
            queue,
            config,
        })
    }

    /// Ledger configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Run Phase A and, if it passes, queue the block for Phase B.
    ///
    /// `bypass` skips the signature and source checks; it exists only for
    /// the genesis bootstrap.
    pub async fn submit_block(&self, raw: &[u8], bypass: bool) -> LedgerResult<Submission> {
        let Some(block) = decode(raw) else {
            debug!(len = raw.len(), "undecodable block");
            return Ok(Submission::Rejected(InsertResult::InvalidFormat));
        };
        let hash = canonical_hash(raw);

        if !bypass {
            if let Err(result) = verify_signature(&block, &hash) {
                debug!(hash = %hash, "bad signature");
                return Ok(Submission::Rejected(result));
            }
        }

        let verdict = {
            let view = self.store.begin_read();
            check_block(&view, &block, &hash, bypass)?
        };
        if let Err(result) = verdict {
            debug!(hash = %hash, result = %result, "block rejected on pre-check");
            return Ok(Submission::Rejected(result));
        }

        let job = WriteJob {
            block,
            hash,
            raw: Bytes::copy_from_slice(raw),
            bypass,
        };
        let rx = self.queue.submit(job).await?;
        Ok(Submission::Queued(PendingInsert { hash, rx }))
    }

    /// Submit a block and wait for the authoritative result
    pub async fn insert_block(&self, raw: &[u8]) -> LedgerResult<InsertResult> {
        self.submit_block(raw, false).await?.result().await
    }

    /// Insert the configured genesis block.
    ///
    /// `Duplicate` once already done; `BadFrontier` when the store was
    /// bootstrapped with a different genesis.
    pub async fn bootstrap_genesis(&self) -> LedgerResult<InsertResult> {
        let block = self.config.genesis.block()?;
        let result = self.submit_block(&block.encode(), true).await?.result().await?;
        match result {
            InsertResult::Success => info!(hash = %block.hash(), amount = %self.config.genesis.amount, "genesis bootstrapped"),
            InsertResult::Duplicate => debug!(hash = %block.hash(), "genesis already present"),
            other => warn!(hash = %block.hash(), result = %other, "genesis refused, store holds a different genesis"),
        }
        Ok(result)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Account state; an unknown account has zero balance and zero head
    pub fn get_account(&self, account: &PublicKey) -> LedgerResult<AccountState> {
        Ok(self.store.begin_read().get_account(account)?.unwrap_or_default())
    }

    /// Up to `limit` pending transfers owed to `recipient`, ordered by send hash
    pub fn get_pending(&self, recipient: &PublicKey, limit: usize) -> LedgerResult<Vec<PendingTransfer>> {
        Ok(self.store.begin_read().pending_for(recipient, Some(limit))?)
    }

    /// Every account, ordered by key
    pub fn list_accounts(&self) -> LedgerResult<Vec<(PublicKey, AccountState)>> {
        Ok(self.store.begin_read().accounts()?)
    }

    /// Every pending transfer, ordered by key
    pub fn list_pending(&self) -> LedgerResult<Vec<PendingTransfer>> {
        Ok(self.store.begin_read().all_pending()?)
    }

    /// Stored block by hash
    pub fn get_block(&self, hash: &H256) -> LedgerResult<Option<Block>> {
        match self.store.begin_read().get_block(hash)? {
            Some(raw) => decode(&raw)
                .map(Some)
                .ok_or_else(|| StorageError::corrupt(Table::Blocks, format!("block {}", hash)).into()),
            None => Ok(None),
        }
    }

    /// Check whether a block is stored
    pub fn contains_block(&self, hash: &H256) -> LedgerResult<bool> {
        Ok(self.store.begin_read().contains_block(hash)?)
    }

    /// Blocks admitted to the write queue and not yet picked up
    pub fn queue_len(&self) -> usize {
        self.queue.queued()
    }

    /// Whether the writer stopped after a fatal error
    pub fn is_halted(&self) -> bool {
        self.queue.is_halted()
    }

    /// Sum of all balances and all pending amounts, from one snapshot
    pub fn total_supply(&self) -> LedgerResult<Amount> {
        let view = self.store.begin_read();
        let balances = view.accounts()?.into_iter().map(|(_, state)| state.balance);
        let pending = view.all_pending()?.into_iter().map(|p| p.amount);
        balances
            .chain(pending)
            .try_fold(0, |total: Amount, amount| total.checked_add(amount))
            .ok_or_else(|| StorageError::Overflow("total supply".into()).into())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Register a subscriber; it is called on the writer thread after each commit
    pub fn subscribe(&self, subscriber: impl Subscriber + 'static) {
        self.events.subscribe(subscriber);
    }

    /// Receive every event through an unbounded channel; see
    /// [`EventBus::subscribe_channel`](crate::events::EventBus::subscribe_channel)
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<LedgerEvent> {
        self.events.subscribe_channel()
    }

    /// Finish queued writes and stop the writer
    pub fn shutdown(self) {
        self.queue.shutdown();
        info!("ledger closed");
    }
}
