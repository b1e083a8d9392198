//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (clock, NFC radio) are abstracted behind traits.
//! This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch real hardware
//!
//! Usage: swap real implementations for nullables in tests and in the
//! simulated CLI flow.

pub mod clock;
pub mod radio;

pub use clock::NullClock;
pub use radio::{NullRadio, RadioCounters};
