//! Block format errors

use thiserror::Error;

/// Error building a block from its fields
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Block kind name is not recognized
    #[error("unknown block kind: {0}")]
    UnknownKind(String),

    /// Block kind is reserved but has no wire layout yet
    #[error("block kind {0} is reserved and not supported")]
    UnsupportedKind(&'static str),

    /// A required field was not supplied
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A field is not valid hex
    #[error("field {field} is not valid hex: {reason}")]
    InvalidHex {
        /// Field name
        field: &'static str,
        /// Decoder message
        reason: String,
    },

    /// A field does not fit its fixed slot
    #[error("field {field} has wrong length: expected {expected} bytes, got {got}")]
    FieldLength {
        /// Field name
        field: &'static str,
        /// Slot size in bytes
        expected: usize,
        /// Decoded size in bytes
        got: usize,
    },

    /// A field is not a valid address
    #[error("field {field} is not a valid address: {reason}")]
    InvalidAddress {
        /// Field name
        field: &'static str,
        /// Address decoder message
        reason: String,
    },

    /// A numeric field does not parse or overflows its slot
    #[error("field {field} is not a valid number: {value}")]
    InvalidNumber {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: String,
    },
}

/// Result type for block formatting
pub type FormatResult<T> = Result<T, FormatError>;
