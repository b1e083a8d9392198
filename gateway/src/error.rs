use tappay_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The caller's input is malformed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Building, signing or relaying the payment failed. Details are logged.
    #[error("failed to send payment")]
    Submission,

    /// The balance query failed. Details are logged.
    #[error("failed to fetch balance")]
    Balance,

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("gateway not configured: {0}")]
    NotConfigured(&'static str),
}
