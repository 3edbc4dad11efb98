//! Genesis block
//!
//! The genesis block is a `Send` from the all-zero null account with zero
//! previous, reference and signature. It is inserted with checks bypassed
//! and credits the genesis account directly.

use crate::error::{LedgerError, LedgerResult};
use aur_crypto::decode_address;
use aur_primitives::{Amount, PublicKey, Timestamp, H256};
use aur_types::{Block, SendBlock};
use serde::{Deserialize, Serialize};

/// Network genesis address
pub const GENESIS_ADDRESS: &str = "aur_AUdeYSF6fZ6XKY8F39Kp8hvCLbX4t7WFY7p6rq8TJ9sEgUAtkZGxqb6";

/// Initial supply
pub const GENESIS_AMOUNT: Amount = 15_000_000_000_000;

/// Genesis parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Address receiving the initial supply
    pub address: String,
    /// Initial supply
    pub amount: Amount,
    /// Block timestamp
    pub timestamp: Timestamp,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            address: GENESIS_ADDRESS.to_string(),
            amount: GENESIS_AMOUNT,
            timestamp: 0,
        }
    }
}

impl GenesisConfig {
    /// Genesis account key
    pub fn account(&self) -> LedgerResult<PublicKey> {
        decode_address(&self.address)
            .map_err(|e| LedgerError::Config(format!("genesis address {}: {}", self.address, e)))
    }

    /// Build the genesis block
    pub fn block(&self) -> LedgerResult<Block> {
        Ok(Block::Send(SendBlock::new(
            PublicKey::NULL,
            self.account()?,
            self.amount,
            H256::ZERO,
            self.timestamp,
        )))
    }
}
