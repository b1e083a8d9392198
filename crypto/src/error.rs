use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("placeholder wallets cannot sign transactions")]
    PlaceholderWallet,
}
