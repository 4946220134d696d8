//! Error handling for the ledger
//!
//! Every fallible operation in the crate returns [`Result`], so callers
//! only ever match on one error type.

use crate::core::Amount;
use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger operations
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Sender's pending-adjusted balance does not cover the amount
    InsufficientFunds { required: Amount, available: Amount },
    /// Amount is zero, negative, or not a number
    InvalidAmount(String),
    /// Malformed transaction record (empty identifier, reserved sender)
    InvalidTransaction(String),
    /// Broken link, bad proof, or bad reward found while auditing the chain
    ChainIntegrityViolation { index: usize, reason: String },
    /// Durable state could not be read or written
    PersistenceFailure(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Configuration errors
    Config(String),
    /// Proof search gave up without finding a proof
    Mining(String),
    /// Proof search was cancelled through its token
    MiningCancelled,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient funds: required {required}, available {available}"
                )
            }
            LedgerError::InvalidAmount(msg) => write!(f, "Invalid amount: {msg}"),
            LedgerError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {msg}"),
            LedgerError::ChainIntegrityViolation { index, reason } => {
                write!(f, "Chain integrity violation at block {index}: {reason}")
            }
            LedgerError::PersistenceFailure(msg) => write!(f, "Persistence failure: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LedgerError::Mining(msg) => write!(f, "Mining error: {msg}"),
            LedgerError::MiningCancelled => write!(f, "Mining cancelled"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<sled::Error> for LedgerError {
    fn from(err: sled::Error) -> Self {
        LedgerError::PersistenceFailure(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for LedgerError {
    fn from(err: bincode::error::EncodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for LedgerError {
    fn from(err: bincode::error::DecodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}
