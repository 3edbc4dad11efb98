//! Block types for the Aurium block lattice

use crate::codec;
use aur_crypto::{Keypair, Signature};
use aur_primitives::{Amount, PublicKey, Timestamp, H256};
use std::fmt;

/// Opaque 16-byte reference carried by `Send` blocks
pub type Reference = [u8; 16];

/// Block kind, the first byte of every encoded block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockKind {
    /// Debits the source chain and creates a pending transfer
    Send = 0,
    /// Claims a pending transfer onto the recipient chain
    Receive = 1,
    /// Reserved tag, no layout
    Split = 2,
    /// Reserved tag, no layout
    Claim = 3,
}

impl BlockKind {
    /// Map a tag byte to a kind
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(BlockKind::Send),
            1 => Some(BlockKind::Receive),
            2 => Some(BlockKind::Split),
            3 => Some(BlockKind::Claim),
            _ => None,
        }
    }

    /// Tag byte
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Canonical upper-case name
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Send => "SEND",
            BlockKind::Receive => "RECEIVE",
            BlockKind::Split => "SPLIT",
            BlockKind::Claim => "CLAIM",
        }
    }

    /// Parse a kind name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SEND" => Some(BlockKind::Send),
            "RECEIVE" => Some(BlockKind::Receive),
            "SPLIT" => Some(BlockKind::Split),
            "CLAIM" => Some(BlockKind::Claim),
            _ => None,
        }
    }

    /// Fixed encoded size, `None` for reserved kinds
    pub fn encoded_len(self) -> Option<usize> {
        match self {
            BlockKind::Send => Some(codec::SEND_BLOCK_LEN),
            BlockKind::Receive => Some(codec::RECEIVE_BLOCK_LEN),
            BlockKind::Split | BlockKind::Claim => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Debit on the source account's chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendBlock {
    /// Debited account, and the signer
    pub source: PublicKey,
    /// Account the pending transfer is owed to
    pub recipient: PublicKey,
    /// Amount moved
    pub amount: Amount,
    /// Source account head before this block
    pub previous: H256,
    /// Opaque reference
    pub reference: Reference,
    /// Creation time
    pub timestamp: Timestamp,
    /// Signature over the canonical hash
    pub signature: Signature,
}

impl SendBlock {
    /// Create an unsigned send block
    pub fn new(
        source: PublicKey,
        recipient: PublicKey,
        amount: Amount,
        previous: H256,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            source,
            recipient,
            amount,
            previous,
            reference: [0u8; 16],
            timestamp,
            signature: Signature::ZERO,
        }
    }

    /// Set the opaque reference
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = reference;
        self
    }

    /// Sign with the source keypair
    pub fn signed(mut self, keypair: &Keypair) -> Self {
        self.signature = keypair.sign(&self.hash());
        self
    }

    /// Canonical hash
    pub fn hash(&self) -> H256 {
        codec::canonical_hash(&codec::encode_send(self))
    }
}

/// Credit on the recipient account's chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiveBlock {
    /// Credited account, and the signer
    pub recipient: PublicKey,
    /// Hash of the send block being claimed
    pub claimed_hash: H256,
    /// Recipient account head before this block
    pub previous: H256,
    /// Creation time
    pub timestamp: Timestamp,
    /// Signature over the canonical hash
    pub signature: Signature,
}

impl ReceiveBlock {
    /// Create an unsigned receive block
    pub fn new(recipient: PublicKey, claimed_hash: H256, previous: H256, timestamp: Timestamp) -> Self {
        Self {
            recipient,
            claimed_hash,
            previous,
            timestamp,
            signature: Signature::ZERO,
        }
    }

    /// Sign with the recipient keypair
    pub fn signed(mut self, keypair: &Keypair) -> Self {
        self.signature = keypair.sign(&self.hash());
        self
    }

    /// Canonical hash
    pub fn hash(&self) -> H256 {
        codec::canonical_hash(&codec::encode_receive(self))
    }
}

/// A decoded block
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Send block
    Send(SendBlock),
    /// Receive block
    Receive(ReceiveBlock),
}

impl Block {
    /// Block kind
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Send(_) => BlockKind::Send,
            Block::Receive(_) => BlockKind::Receive,
        }
    }

    /// Account whose chain this block extends; it must have signed the block
    pub fn signer(&self) -> PublicKey {
        match self {
            Block::Send(send) => send.source,
            Block::Receive(receive) => receive.recipient,
        }
    }

    /// Declared head of the signer's chain before this block
    pub fn previous(&self) -> H256 {
        match self {
            Block::Send(send) => send.previous,
            Block::Receive(receive) => receive.previous,
        }
    }

    /// Trailing signature
    pub fn signature(&self) -> &Signature {
        match self {
            Block::Send(send) => &send.signature,
            Block::Receive(receive) => &receive.signature,
        }
    }

    /// Block timestamp
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Block::Send(send) => send.timestamp,
            Block::Receive(receive) => receive.timestamp,
        }
    }

    /// Encode to wire bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Block::Send(send) => codec::encode_send(send),
            Block::Receive(receive) => codec::encode_receive(receive),
        }
    }

    /// Canonical hash
    pub fn hash(&self) -> H256 {
        codec::canonical_hash(&self.encode())
    }
}

impl From<SendBlock> for Block {
    fn from(block: SendBlock) -> Self {
        Block::Send(block)
    }
}

impl From<ReceiveBlock> for Block {
    fn from(block: ReceiveBlock) -> Self {
        Block::Receive(block)
    }
}
