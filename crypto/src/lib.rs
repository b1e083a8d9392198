//! Cryptographic primitives for TapPay.
//!
//! - **secp256k1** keypairs for generated wallets
//! - **Keccak-256** for address derivation
//! - Address validation (`0x` + 40 hex digits) and display shortening
//! - Wallet generation, real or placeholder

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod wallet;

pub use address::{derive_address, short_address, validate_address};
pub use error::CryptoError;
pub use hash::keccak256;
pub use keys::{generate_keypair, keypair_from_private, public_from_private};
pub use wallet::{GeneratedWallet, WalletFactory, WalletKind};
