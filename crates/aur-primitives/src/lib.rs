//! # aur-primitives
//!
//! Primitive types for the Aurium block-lattice ledger.
//!
//! This crate provides the fixed-width values every other crate shares:
//! block hashes and account public keys.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod key;

pub use error::PrimitiveError;
pub use hash::{Hash, HashError, H256};
pub use key::{KeyError, PublicKey};

/// Token amount (smallest unit)
pub type Amount = u128;

/// Block timestamp (seconds since the Unix epoch)
pub type Timestamp = u64;
