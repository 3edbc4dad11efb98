//! Outcome codes of a block insertion

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of inserting one block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsertResult {
    /// Applied and committed
    Success,
    /// Unknown kind or malformed encoding
    InvalidFormat,
    /// Signature does not verify
    BadSignature,
    /// Hash already stored
    Duplicate,
    /// Declared previous is not the signer's current head
    BadFrontier,
    /// Send amount exceeds the source balance
    InsufficientFunds,
    /// Send source has no account
    AccountNotFound,
    /// Receive claims a transfer that is not pending
    PendingNotFound,
}

impl InsertResult {
    /// Wire code
    pub fn as_str(self) -> &'static str {
        match self {
            InsertResult::Success => "SUCCESS",
            InsertResult::InvalidFormat => "INVALID_FORMAT",
            InsertResult::BadSignature => "BAD_SIGNATURE",
            InsertResult::Duplicate => "DUPLICATE",
            InsertResult::BadFrontier => "BAD_FRONTIER",
            InsertResult::InsufficientFunds => "INSUFFICIENT_FUNDS",
            InsertResult::AccountNotFound => "ACCOUNT_NOT_FOUND",
            InsertResult::PendingNotFound => "PENDING_NOT_FOUND",
        }
    }

    /// Check for `Success`
    pub fn is_success(self) -> bool {
        self == InsertResult::Success
    }
}

impl fmt::Display for InsertResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
