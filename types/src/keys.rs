//! Key material for account signing.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ValidationError;

/// A 64-byte uncompressed secp256k1 public key (without the `0x04` tag).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 64]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", hex::encode(&self.0[..4]))
    }
}

/// A 32-byte secp256k1 secret scalar.
///
/// This type intentionally does not implement `Serialize` or `Clone` and its
/// `Debug` output is redacted. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

impl PrivateKey {
    /// Parse `0x`-prefixed (or bare) 64-digit hex.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| ValidationError::InvalidPrivateKey)?;
        Ok(Self(bytes))
    }

    /// `0x`-prefixed hex. Only for explicit export by the key owner.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A secp256k1 key pair (public + private).
///
/// Use `tappay_crypto::generate_keypair()` or `tappay_crypto::keypair_from_private()`
/// to construct key pairs. This struct is intentionally just data.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}
