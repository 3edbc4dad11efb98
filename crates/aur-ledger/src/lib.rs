//! # aur-ledger
//!
//! The Aurium ledger engine.
//!
//! This crate provides:
//! - [`InsertResult`] - caller-facing outcome codes of a block insertion
//! - [`validator`] - pure checks against a state snapshot
//! - [`serializer`] - the single-writer FIFO admission queue
//! - [`events`] - lifecycle events and the subscriber registry
//! - [`Ledger`] - two-phase block insertion and query accessors

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod events;
pub mod genesis;
pub mod ledger;
pub mod result;
pub mod serializer;
pub mod validator;

pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use events::{LedgerEvent, Subscriber};
pub use genesis::{GenesisConfig, GENESIS_ADDRESS, GENESIS_AMOUNT};
pub use ledger::{Ledger, PendingInsert, Submission};
pub use result::InsertResult;
