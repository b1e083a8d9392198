//! The payment request carried on a tag.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A `{recipient, amount}` pair handed from the paying device to the
/// receiving one.
///
/// Neither field is validated here: the recipient is whatever text was on
/// the tag and the amount is an unparsed decimal string. Callers check both
/// before submitting anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub recipient: String,
    pub amount: String,
    /// Set when the request was written; absent for legacy tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl PaymentRequest {
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
