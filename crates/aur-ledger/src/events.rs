//! Ledger lifecycle events
//!
//! Events raised while a block is applied are buffered and handed to
//! [`EventBus::dispatch`] only after the write transaction commits. Delivery
//! is synchronous, in registration order; a panicking subscriber is logged
//! and skipped.

use aur_primitives::{PublicKey, H256};
use aur_types::{AccountState, PendingTransfer};
use bytes::Bytes;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Event raised by a committed block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum LedgerEvent {
    /// A block was stored
    #[serde(rename_all = "camelCase")]
    BlockInserted {
        /// Block hash
        hash: H256,
        /// Encoded block
        #[serde(with = "hex_bytes")]
        block: Bytes,
    },
    /// An account's balance or head changed
    #[serde(rename_all = "camelCase")]
    AccountState {
        /// Account key
        account: PublicKey,
        /// State after the block
        state: AccountState,
    },
    /// A send created a pending transfer
    Pending(PendingTransfer),
}

impl LedgerEvent {
    /// Event name as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::BlockInserted { .. } => "blockInserted",
            LedgerEvent::AccountState { .. } => "accountState",
            LedgerEvent::Pending(_) => "pending",
        }
    }
}

/// Receives ledger events
pub trait Subscriber: Send + Sync {
    /// Called once per event, on the writer thread
    fn on_event(&self, event: &LedgerEvent);
}

impl<F> Subscriber for F
where
    F: Fn(&LedgerEvent) + Send + Sync,
{
    fn on_event(&self, event: &LedgerEvent) {
        self(event)
    }
}

/// Forwards events into an unbounded channel
struct ChannelSubscriber {
    tx: mpsc::UnboundedSender<LedgerEvent>,
}

impl Subscriber for ChannelSubscriber {
    fn on_event(&self, event: &LedgerEvent) {
        // a dropped receiver just stops listening
        let _ = self.tx.send(event.clone());
    }
}

/// Ordered subscriber registry
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Arc<dyn Subscriber>>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber after all existing ones
    pub fn subscribe(&self, subscriber: impl Subscriber + 'static) {
        self.subscribers.write().push(Arc::new(subscriber));
    }

    /// Register a channel and return its receiving end.
    ///
    /// The channel is unbounded and filled from the writer thread: a receiver
    /// that is kept but never drained grows without limit. Drop the receiver
    /// to unsubscribe.
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<LedgerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe(ChannelSubscriber { tx });
        rx
    }

    /// Deliver events in order to every subscriber
    pub fn dispatch(&self, events: &[LedgerEvent]) {
        if events.is_empty() {
            return;
        }
        // snapshot so a subscriber may register others without deadlocking
        let subscribers = self.subscribers.read().clone();
        for event in events {
            for (index, subscriber) in subscribers.iter().enumerate() {
                let delivered = catch_unwind(AssertUnwindSafe(|| subscriber.on_event(event)));
                if delivered.is_err() {
                    warn!(subscriber = index, event = event.name(), "event subscriber panicked");
                }
            }
        }
    }
}

mod hex_bytes {
    use bytes::Bytes;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map(Bytes::from).map_err(de::Error::custom)
    }
}
