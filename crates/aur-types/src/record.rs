//! Persisted ledger records and their fixed binary forms

use aur_primitives::{Amount, PublicKey, H256};
use serde::{Deserialize, Serialize};

/// Size of an encoded amount
pub const AMOUNT_LEN: usize = 16;

/// Encode an amount as 16 big-endian bytes
pub fn encode_amount(amount: Amount) -> [u8; AMOUNT_LEN] {
    amount.to_be_bytes()
}

/// Decode an amount, `None` unless exactly 16 bytes
pub fn decode_amount(bytes: &[u8]) -> Option<Amount> {
    let bytes: [u8; AMOUNT_LEN] = bytes.try_into().ok()?;
    Some(Amount::from_be_bytes(bytes))
}

/// Balance and chain head of one account
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Spendable balance
    #[serde(with = "amount_string")]
    pub balance: Amount,
    /// Hash of the latest block on the account chain
    pub head: H256,
}

impl AccountState {
    /// Encoded size: balance (16) then head (32)
    pub const ENCODED_LEN: usize = AMOUNT_LEN + H256::LEN;

    /// Create a new account state
    pub fn new(balance: Amount, head: H256) -> Self {
        Self { balance, head }
    }

    /// Encode to bytes
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[..AMOUNT_LEN].copy_from_slice(&encode_amount(self.balance));
        out[AMOUNT_LEN..].copy_from_slice(self.head.as_bytes());
        out
    }

    /// Decode from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return None;
        }
        Some(Self {
            balance: decode_amount(&bytes[..AMOUNT_LEN])?,
            head: H256::from_slice(&bytes[AMOUNT_LEN..]).ok()?,
        })
    }
}

/// Key of a pending transfer: recipient followed by the send hash.
///
/// Keys sort by recipient first, so a recipient's pending set is one
/// contiguous prefix range ordered by send hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PendingKey {
    /// Account owed the transfer
    pub recipient: PublicKey,
    /// Hash of the originating send
    pub send_hash: H256,
}

impl PendingKey {
    /// Encoded size
    pub const ENCODED_LEN: usize = PublicKey::LEN + H256::LEN;

    /// Create a key
    pub fn new(recipient: PublicKey, send_hash: H256) -> Self {
        Self { recipient, send_hash }
    }

    /// Scan prefix covering every pending entry for `recipient`
    pub fn prefix(recipient: &PublicKey) -> [u8; PublicKey::LEN] {
        *recipient.as_bytes()
    }

    /// Encode to bytes
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[..PublicKey::LEN].copy_from_slice(self.recipient.as_bytes());
        out[PublicKey::LEN..].copy_from_slice(self.send_hash.as_bytes());
        out
    }

    /// Decode from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return None;
        }
        Some(Self {
            recipient: PublicKey::from_slice(&bytes[..PublicKey::LEN]).ok()?,
            send_hash: H256::from_slice(&bytes[PublicKey::LEN..]).ok()?,
        })
    }
}

/// A send that has not been claimed yet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransfer {
    /// Account owed the transfer
    pub recipient: PublicKey,
    /// Hash of the originating send
    pub send_hash: H256,
    /// Amount owed
    #[serde(with = "amount_string")]
    pub amount: Amount,
}

impl PendingTransfer {
    /// Storage key of this entry
    pub fn key(&self) -> PendingKey {
        PendingKey::new(self.recipient, self.send_hash)
    }
}

/// u128 amounts travel as decimal strings in JSON
mod amount_string {
    use aur_primitives::Amount;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
