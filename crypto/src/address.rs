//! Account address validation and derivation.
//!
//! Address format: `0x` + hex(keccak256(uncompressed_public_key)[12..32]).
//! Validation only checks that shape; EIP-55 mixed-case checksums are not
//! verified.

use tappay_types::{Address, PublicKey};

use crate::keccak256;

/// Whether `address` is `0x` followed by exactly 40 hex digits.
pub fn validate_address(address: &str) -> bool {
    Address::is_well_formed(address)
}

/// Derive the account address of a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let hash = keccak256(public_key.as_bytes());
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(bytes)
}

/// Shorten an address for display: `0x1234...7890`.
///
/// Strings too short to shorten are returned unchanged.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
