//! Keccak-256 hashing.

use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 hash of arbitrary data.
///
/// This is the pre-standard Keccak padding, not SHA3-256.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
