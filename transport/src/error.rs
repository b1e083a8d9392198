use std::time::Duration;
use thiserror::Error;

use crate::StackError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("NFC is not supported on this platform")]
    UnsupportedPlatform,

    #[error("another tag session is already in progress")]
    Busy,

    #[error("no tag session within {0:?}")]
    AcquireTimeout(Duration),

    #[error("radio stack error: {0}")]
    Stack(#[from] StackError),
}
