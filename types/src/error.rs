//! Validation errors shared across crates.

use thiserror::Error;

/// A user-correctable problem with an address, amount or key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("amount {amount:?} has more than {max} decimal places")]
    TooManyDecimals { amount: String, max: u32 },

    #[error("amount {0:?} is out of range")]
    AmountOverflow(String),

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    /// The key material itself is never echoed back.
    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("missing {0}")]
    Missing(&'static str),
}
