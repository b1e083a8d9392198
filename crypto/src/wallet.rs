//! Wallet generation.
//!
//! Two strategies, picked by configuration rather than by probing the host:
//! a real secp256k1 account, or a placeholder of the right shape for hosts
//! without signing support. Placeholder keys are random hex, not keys.

use rand::rngs::OsRng;
use rand::RngCore;
use tappay_types::{Address, PrivateKey};

use crate::{derive_address, generate_keypair, CryptoError};

/// Whether a generated wallet can sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletKind {
    /// Real account: the address is derived from the private key.
    Account,
    /// Shape-only stand-in. Never usable for signing.
    Placeholder,
}

/// How new wallets are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WalletFactory {
    #[default]
    Secp256k1,
    Placeholder,
}

/// The output of [`WalletFactory::generate`].
#[derive(Debug)]
pub struct GeneratedWallet {
    pub address: Address,
    private_key: PrivateKey,
    pub kind: WalletKind,
}

impl WalletFactory {
    /// Produce a new address/private-key pair.
    pub fn generate(&self) -> GeneratedWallet {
        match self {
            Self::Secp256k1 => {
                let keypair = generate_keypair();
                GeneratedWallet {
                    address: derive_address(&keypair.public),
                    private_key: keypair.private,
                    kind: WalletKind::Account,
                }
            }
            Self::Placeholder => {
                let mut address = [0u8; 20];
                let mut key = [0u8; 32];
                OsRng.fill_bytes(&mut address);
                OsRng.fill_bytes(&mut key);
                tracing::warn!("generated placeholder wallet; it cannot sign transactions");
                GeneratedWallet {
                    address: Address::from_bytes(address),
                    private_key: PrivateKey(key),
                    kind: WalletKind::Placeholder,
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Placeholder => "placeholder",
        }
    }
}

impl GeneratedWallet {
    /// The private key, only for real accounts.
    pub fn signing_key(&self) -> Result<&PrivateKey, CryptoError> {
        match self.kind {
            WalletKind::Account => Ok(&self.private_key),
            WalletKind::Placeholder => Err(CryptoError::PlaceholderWallet),
        }
    }

    /// `0x`-prefixed private key hex, for explicit export.
    ///
    /// Placeholder wallets export their placeholder hex too; it is shaped
    /// like a key but is not one.
    pub fn export_private_key(&self) -> String {
        self.private_key.to_hex()
    }

    pub fn can_sign(&self) -> bool {
        self.kind == WalletKind::Account
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{keypair_from_private, validate_address};

    #[test]
    fn secp256k1_wallet_is_real_account() {
        let wallet = WalletFactory::Secp256k1.generate();
        assert_eq!(wallet.kind, WalletKind::Account);
        assert!(wallet.can_sign());
        assert!(validate_address(wallet.address.as_str()));

        let key = PrivateKey(*wallet.signing_key().unwrap().as_bytes());
        let kp = keypair_from_private(key).unwrap();
        assert_eq!(derive_address(&kp.public), wallet.address);
    }

    #[test]
    fn placeholder_wallet_has_shape_but_cannot_sign() {
        let wallet = WalletFactory::Placeholder.generate();
        assert_eq!(wallet.kind, WalletKind::Placeholder);
        assert!(validate_address(wallet.address.as_str()));
        assert_eq!(wallet.export_private_key().len(), 66);
        assert!(matches!(
            wallet.signing_key(),
            Err(CryptoError::PlaceholderWallet)
        ));
    }

    #[test]
    fn wallets_are_unique() {
        let a = WalletFactory::Secp256k1.generate();
        let b = WalletFactory::Secp256k1.generate();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn debug_hides_key() {
        let wallet = WalletFactory::Secp256k1.generate();
        let text = format!("{wallet:?}");
        assert!(text.contains("<redacted>"));
        assert!(!text.contains(&wallet.export_private_key()[2..]));
    }
}
