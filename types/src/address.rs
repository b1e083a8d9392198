//! Account address type: `0x` followed by 40 hex digits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::ValidationError;

/// A 20-byte account address in its textual form.
///
/// Only the shape is checked: `0x` + 40 hex digits, any case. Mixed-case
/// EIP-55 checksums are accepted but never verified. The original casing is
/// preserved for display; comparison ignores case.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Total length of a textual address, prefix included.
    pub const LEN: usize = 42;

    /// The hex prefix every address starts with.
    pub const PREFIX: &'static str = "0x";

    /// Parse and validate a textual address.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if Self::is_well_formed(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidAddress(raw.to_string()))
        }
    }

    /// Whether `raw` matches `^0x[0-9a-fA-F]{40}$`.
    pub fn is_well_formed(raw: &str) -> bool {
        if raw.is_empty() || raw.len() != Self::LEN {
            return false;
        }
        match raw.strip_prefix(Self::PREFIX) {
            Some(digits) => digits.bytes().all(|b| b.is_ascii_hexdigit()),
            None => false,
        }
    }

    /// Build an address from raw bytes (lowercase hex).
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(format!("{}{}", Self::PREFIX, hex::encode(bytes)))
    }

    /// The raw 20 bytes.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        // Shape was checked at construction.
        if let Ok(decoded) = hex::decode(&self.0[Self::PREFIX.len()..]) {
            out.copy_from_slice(&decoded);
        }
        out
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form, used for comparisons and hashing.
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_lowercase().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if Self::is_well_formed(&s) {
            Ok(Self(s))
        } else {
            Err(ValidationError::InvalidAddress(s))
        }
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
