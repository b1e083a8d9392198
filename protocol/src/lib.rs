//! Tag payload protocol: NDEF framing and payment request encoding/decoding.
//!
//! Two payload generations share one tag format:
//! - current: a JSON payment request in a single NDEF text record
//! - legacy: `"<recipient>:<amount>"` in the same kind of record
//!
//! Encoders only emit the current generation; decoders accept both.

pub mod codec;
pub mod error;
pub mod ndef;

pub use codec::{decode, decode_text, encode, encode_at, DecodeOutcome, PayloadGeneration};
pub use error::ProtocolError;
pub use ndef::NdefRecord;
