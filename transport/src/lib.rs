//! NFC tag transport.
//!
//! [`TagTransport`] sequences one tag session at a time over a host
//! [`RadioStack`]: acquire the technology session, read or write a single
//! NDEF message, release. Release always happens exactly once, whether the
//! operation succeeds, fails, times out acquiring, or is dropped by the
//! caller mid-flight.

pub mod error;
pub mod stack;
pub mod state;
pub mod transport;

pub use error::TransportError;
pub use stack::{RadioStack, StackError};
pub use state::TransportState;
pub use transport::{TagTransport, DEFAULT_ACQUIRE_TIMEOUT, WRITE_SUCCESS_MESSAGE};
