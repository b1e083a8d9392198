//! secp256k1 key generation.

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{PublicKey as SecpPublicKey, Secp256k1, SecretKey};
use tappay_types::{KeyPair, PrivateKey, PublicKey};

use crate::CryptoError;

/// Generate a new key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let mut bytes = [0u8; 32];
    loop {
        OsRng.fill_bytes(&mut bytes);
        // Zero and values >= the curve order are rejected; retry.
        if let Ok(keypair) = keypair_from_private(PrivateKey(bytes)) {
            return keypair;
        }
    }
}

/// Derive the 64-byte uncompressed public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, CryptoError> {
    let secret = SecretKey::from_slice(private.as_bytes()).map_err(|_| CryptoError::InvalidPrivateKey)?;
    let secp = Secp256k1::signing_only();
    let uncompressed = SecpPublicKey::from_secret_key(&secp, &secret).serialize_uncompressed();
    let mut public = [0u8; 64];
    public.copy_from_slice(&uncompressed[1..]);
    Ok(PublicKey(public))
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> Result<KeyPair, CryptoError> {
    let public = public_from_private(&private)?;
    Ok(KeyPair { public, private })
}
