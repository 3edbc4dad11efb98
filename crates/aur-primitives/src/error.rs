//! Common error types for primitives

use crate::hash::HashError;
use crate::key::KeyError;
use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Error)]
pub enum PrimitiveError {
    /// Public key error
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// Hash error
    #[error("hash error: {0}")]
    Hash(#[from] HashError),
}
