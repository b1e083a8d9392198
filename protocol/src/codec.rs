//! Payment request codec: tag bytes to and from [`PaymentRequest`].
//!
//! Tag bytes are usually an NDEF message holding one text record, but a bare
//! UTF-8 payload is accepted too. Decoding the text is an ordered attempt:
//! JSON first, then the legacy `recipient:amount` form. A payload matching neither is a normal outcome
//! ([`DecodeOutcome::Unrecognized`]), not an error. The codec never checks
//! that the recipient is an address or that the amount is a number.

use serde_json::Value;
use tappay_types::{PaymentRequest, Timestamp};

use crate::ndef::{self, NdefRecord};
use crate::ProtocolError;

/// Language code written into text records.
pub const TEXT_LANGUAGE: &str = "en";

/// Which payload generation a tag carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadGeneration {
    /// `{"recipient":..,"amount":..,"timestamp":..}`
    Json,
    /// `recipient:amount`
    Legacy,
}

/// The result of decoding a tag payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    Json(PaymentRequest),
    Legacy(PaymentRequest),
    /// The tag held something, or nothing, that is not a payment request.
    Unrecognized,
}

impl DecodeOutcome {
    pub fn request(&self) -> Option<&PaymentRequest> {
        match self {
            Self::Json(req) | Self::Legacy(req) => Some(req),
            Self::Unrecognized => None,
        }
    }

    pub fn into_request(self) -> Option<PaymentRequest> {
        match self {
            Self::Json(req) | Self::Legacy(req) => Some(req),
            Self::Unrecognized => None,
        }
    }

    pub fn generation(&self) -> Option<PayloadGeneration> {
        match self {
            Self::Json(_) => Some(PayloadGeneration::Json),
            Self::Legacy(_) => Some(PayloadGeneration::Legacy),
            Self::Unrecognized => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// Encode a payment request stamped with the current time.
pub fn encode(recipient: &str, amount: &str) -> Result<Vec<u8>, ProtocolError> {
    encode_at(recipient, amount, Timestamp::now())
}

/// Encode a payment request with an explicit timestamp.
pub fn encode_at(
    recipient: &str,
    amount: &str,
    timestamp: Timestamp,
) -> Result<Vec<u8>, ProtocolError> {
    let request = PaymentRequest::new(recipient, amount).with_timestamp(timestamp);
    encode_request(&request)
}

/// Encode a prepared request as a single-text-record NDEF message.
pub fn encode_request(request: &PaymentRequest) -> Result<Vec<u8>, ProtocolError> {
    let text =
        serde_json::to_string(request).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
    let record = NdefRecord::text(&text, TEXT_LANGUAGE)?;
    ndef::encode_message(&[record])
}

/// Decode tag bytes.
///
/// An NDEF message contributes the text of its first record when that is a
/// UTF-8 text record. Anything else is read as bare UTF-8 text.
pub fn decode(bytes: &[u8]) -> DecodeOutcome {
    if let Some(text) = ndef_text(bytes) {
        return decode_text(&text);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => decode_text(text),
        Err(_) => {
            tracing::debug!(len = bytes.len(), "tag payload is neither NDEF text nor UTF-8");
            DecodeOutcome::Unrecognized
        }
    }
}

fn ndef_text(bytes: &[u8]) -> Option<String> {
    let records = match ndef::parse_message(bytes) {
        Ok(records) => records,
        Err(e) => {
            tracing::trace!(error = %e, "tag payload is not an NDEF message");
            return None;
        }
    };
    match records.first()?.text_content() {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::trace!(error = %e, "first tag record is not a text record");
            None
        }
    }
}

/// Decode the text of a tag's text record.
///
/// Text that parses as JSON is judged only as JSON; the legacy form is
/// attempted only for text that is not JSON at all. JSON needs non-empty
/// string `recipient` and `amount` fields: a numeric `amount` such as
/// `{"amount": 2.5}` is [`DecodeOutcome::Unrecognized`], because amounts
/// travel as exact decimal strings.
pub fn decode_text(text: &str) -> DecodeOutcome {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => match request_from_json(&value) {
            Some(request) => DecodeOutcome::Json(request),
            None => DecodeOutcome::Unrecognized,
        },
        Err(_) => decode_legacy(text),
    }
}

fn request_from_json(value: &Value) -> Option<PaymentRequest> {
    let object = value.as_object()?;
    let recipient = non_empty_str(object.get("recipient")?)?;
    let amount = non_empty_str(object.get("amount")?)?;
    let mut request = PaymentRequest::new(recipient, amount);
    request.timestamp = object
        .get("timestamp")
        .and_then(Value::as_u64)
        .map(Timestamp::new);
    Some(request)
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn decode_legacy(text: &str) -> DecodeOutcome {
    match text.split_once(':') {
        Some((recipient, amount)) if !recipient.is_empty() && !amount.is_empty() => {
            DecodeOutcome::Legacy(PaymentRequest::new(recipient, amount))
        }
        _ => DecodeOutcome::Unrecognized,
    }
}
