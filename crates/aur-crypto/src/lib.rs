//! # aur-crypto
//!
//! Cryptographic primitives for the Aurium ledger.
//!
//! - blake2b-256 content hashing (block identity)
//! - Ed25519 signatures with blake2b-512 as the internal hash
//! - `aur_` address text encoding with a blake2b checksum

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod signature;

pub use address::{decode_address, encode_address, ADDRESS_PREFIX};
pub use error::CryptoError;
pub use hash::{blake2b_256, checksum};
pub use signature::{sign, verify, Keypair, Signature};
