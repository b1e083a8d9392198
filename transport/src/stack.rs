//! The host radio stack the transport drives.

use async_trait::async_trait;
use thiserror::Error;

/// An error reported by the host radio stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StackError(pub String);

impl StackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Platform NFC stack.
///
/// Implemented by the host platform binding, or by
/// `tappay_nullables::NullRadio` for simulations and tests.
#[async_trait]
pub trait RadioStack: Send + Sync {
    /// Human-readable name of this stack.
    fn name(&self) -> &str;

    /// Bring the stack up. Called once per initialisation.
    async fn start(&self) -> Result<(), StackError>;

    /// Whether the device has NFC hardware.
    async fn is_supported(&self) -> Result<bool, StackError>;

    /// Whether NFC is switched on.
    async fn is_enabled(&self) -> Result<bool, StackError>;

    /// Request the NDEF technology session; resolves once a tag is in range.
    async fn request_session(&self) -> Result<(), StackError>;

    /// Read the NDEF message of the tag in range. `None` if the tag has none.
    async fn read_ndef(&self) -> Result<Option<Vec<u8>>, StackError>;

    /// Write an NDEF message to the tag in range.
    async fn write_ndef(&self, message: &[u8]) -> Result<(), StackError>;

    /// Show a message in the platform's scan sheet, where there is one.
    async fn alert_message(&self, _message: &str) -> Result<(), StackError> {
        Ok(())
    }

    /// Cancel the technology request or end the session.
    ///
    /// Synchronous so it can run from a drop guard when the caller abandons
    /// an operation.
    fn release_session(&self) -> Result<(), StackError>;

    /// Shut the stack down.
    async fn stop(&self) -> Result<(), StackError>;
}
