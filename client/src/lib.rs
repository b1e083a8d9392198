//! TapPay client: the payment facade over codec, transport and gateway.
//!
//! [`PaymentClient`] exposes the operations an app screen needs (validate,
//! generate a wallet, write or read a tag, submit, query balance and
//! history) plus the two composed flows: compose-and-write on the paying
//! device and read-and-submit on the receiving one.

pub mod client;
pub mod config;
pub mod error;
pub mod settings;

pub use client::{PaymentClient, Receipt};
pub use config::{ClientConfig, GatewayMode, RadioMode, WalletMode};
pub use error::ClientError;
pub use settings::Settings;
