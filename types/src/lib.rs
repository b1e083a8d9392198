//! Fundamental types for TapPay.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, base-unit amounts, payment requests, transaction records, hashes,
//! timestamps and network identifiers.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod payment;
pub mod record;
pub mod time;

pub use address::Address;
pub use amount::{from_base_units, parse_positive_amount, to_base_units, BaseUnits};
pub use error::ValidationError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use network::NetworkId;
pub use payment::PaymentRequest;
pub use record::{TransactionRecord, TxKind, TxStatus};
pub use time::Timestamp;
