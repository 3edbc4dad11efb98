//! # aur-types
//!
//! Core ledger types for Aurium.
//!
//! This crate provides:
//! - [`Block`](block::Block) - tagged block sum type (`Send`, `Receive`)
//! - [`codec`] - the fixed binary wire layouts and the canonical hash rule
//! - [`BlockFields`](fields::BlockFields) - text-field block encoder for API callers
//! - [`AccountState`](record::AccountState) and [`PendingKey`](record::PendingKey) - on-disk records

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod codec;
pub mod error;
pub mod fields;
pub mod record;

// Re-export commonly used types
pub use block::{Block, BlockKind, ReceiveBlock, Reference, SendBlock};
pub use codec::{canonical_hash, decode, RECEIVE_BLOCK_LEN, SEND_BLOCK_LEN};
pub use error::{FormatError, FormatResult};
pub use fields::{encode_fields, BlockFields};
pub use record::{decode_amount, encode_amount, AccountState, PendingKey, PendingTransfer};
