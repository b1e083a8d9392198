use tappay_crypto::CryptoError;
use tappay_gateway::GatewayError;
use tappay_protocol::ProtocolError;
use tappay_transport::TransportError;
use tappay_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("payload encoding error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("NFC error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("NFC is not available on this device")]
    NfcUnavailable,

    #[error("tag does not hold a payment request")]
    UnrecognizedPayload,

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The user can fix this by changing their input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Gateway(GatewayError::Validation(_))
                | Self::UnrecognizedPayload
        )
    }

    /// Trying the same operation again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => !matches!(e, TransportError::UnsupportedPlatform),
            Self::Gateway(e) => matches!(
                e,
                GatewayError::Submission | GatewayError::Balance | GatewayError::Rpc(_)
            ),
            _ => false,
        }
    }
}
