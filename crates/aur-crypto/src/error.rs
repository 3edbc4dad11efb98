//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key is not a valid curve point
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Signature failed verification
    #[error("invalid signature")]
    InvalidSignature,

    /// Invalid seed length
    #[error("invalid seed length: expected 32 bytes, got {0}")]
    InvalidSeed(usize),

    /// Address does not start with the network prefix
    #[error("address is missing the {0:?} prefix")]
    MissingPrefix(&'static str),

    /// Address body is not valid Base58
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    /// Decoded address has the wrong length
    #[error("invalid address length: expected 40 bytes, got {0}")]
    InvalidAddressLength(usize),

    /// Address checksum does not match its key
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}
