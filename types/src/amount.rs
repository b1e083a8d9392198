//! Amounts in base units.
//!
//! Amounts are represented as fixed-point integers (u128) with 18 fractional
//! digits to avoid floating-point errors. Decimal strings are parsed and
//! rendered with exact integer arithmetic only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::ValidationError;

/// Number of fractional digits of the native token.
pub const DECIMALS: u32 = 18;

/// Base units per whole token (10^18).
pub const BASE_UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// An amount in the smallest denomination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BaseUnits(u128);

impl BaseUnits {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Big-endian 32-byte word, as used by contract calldata.
    pub fn to_be_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&self.0.to_be_bytes());
        word
    }
}

impl Add for BaseUnits {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for BaseUnits {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for BaseUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", from_base_units(*self))
    }
}

/// Convert a decimal string such as `"2.5"` into base units.
///
/// Accepts `digits`, `digits.digits`, `.digits` and `digits.`; at most
/// [`DECIMALS`] fractional digits. Signs, exponents and whitespace are
/// rejected.
pub fn to_base_units(amount: &str) -> Result<BaseUnits, ValidationError> {
    let invalid = || ValidationError::InvalidAmount(amount.to_string());
    let overflow = || ValidationError::AmountOverflow(amount.to_string());

    let (whole, frac) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > DECIMALS as usize {
        return Err(ValidationError::TooManyDecimals {
            amount: amount.to_string(),
            max: DECIMALS,
        });
    }

    let mut whole_units: u128 = 0;
    for digit in whole.bytes() {
        whole_units = whole_units
            .checked_mul(10)
            .and_then(|v| v.checked_add(u128::from(digit - b'0')))
            .ok_or_else(overflow)?;
    }
    let whole_units = whole_units
        .checked_mul(BASE_UNITS_PER_TOKEN)
        .ok_or_else(overflow)?;

    // At most 18 digits: cannot overflow.
    let mut frac_units: u128 = 0;
    for digit in frac.bytes() {
        frac_units = frac_units * 10 + u128::from(digit - b'0');
    }
    frac_units *= 10u128.pow(DECIMALS - frac.len() as u32);

    whole_units
        .checked_add(frac_units)
        .map(BaseUnits)
        .ok_or_else(overflow)
}

/// Render base units as a decimal string without trailing fractional zeros.
pub fn from_base_units(units: BaseUnits) -> String {
    let whole = units.0 / BASE_UNITS_PER_TOKEN;
    let frac = units.0 % BASE_UNITS_PER_TOKEN;
    if frac == 0 {
        return whole.to_string();
    }
    let padded = format!("{:018}", frac);
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

/// Parse a user-entered amount that must be strictly positive.
pub fn parse_positive_amount(amount: &str) -> Result<BaseUnits, ValidationError> {
    if amount.is_empty() {
        return Err(ValidationError::Missing("amount"));
    }
    let units = to_base_units(amount)?;
    if units.is_zero() {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_token() {
        assert_eq!(to_base_units("1.0").unwrap().raw(), BASE_UNITS_PER_TOKEN);
        assert_eq!(to_base_units("1").unwrap().raw(), BASE_UNITS_PER_TOKEN);
    }

    #[test]
    fn smallest_unit() {
        assert_eq!(to_base_units("0.000000000000000001").unwrap().raw(), 1);
    }

    #[test]
    fn partial_forms() {
        assert_eq!(to_base_units(".5").unwrap().raw(), BASE_UNITS_PER_TOKEN / 2);
        assert_eq!(to_base_units("5.").unwrap().raw(), 5 * BASE_UNITS_PER_TOKEN);
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", ".", "-1", "+1", "1e18", " 1", "1.2.3", "abc", "1,5"] {
            assert!(to_base_units(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_too_many_decimals() {
        let err = to_base_units("0.0000000000000000001").unwrap_err();
        assert!(matches!(err, ValidationError::TooManyDecimals { max: 18, .. }));
    }

    #[test]
    fn rejects_overflow() {
        let err = to_base_units("340282366920938463463.374607431768211456").unwrap_err();
        assert!(matches!(err, ValidationError::AmountOverflow(_)));
        assert!(to_base_units("999999999999999999999999999999999999999999").is_err());
    }

    #[test]
    fn renders_normalized() {
        assert_eq!(from_base_units(BaseUnits::new(BASE_UNITS_PER_TOKEN)), "1");
        assert_eq!(from_base_units(BaseUnits::new(25 * BASE_UNITS_PER_TOKEN / 10)), "2.5");
        assert_eq!(from_base_units(BaseUnits::new(1)), "0.000000000000000001");
        assert_eq!(from_base_units(BaseUnits::ZERO), "0");
    }

    #[test]
    fn roundtrip_keeps_precision() {
        let units = to_base_units("12.345678901234567891").unwrap();
        assert_eq!(from_base_units(units), "12.345678901234567891");
    }

    #[test]
    fn positive_amount_checks() {
        assert_eq!(parse_positive_amount(""), Err(ValidationError::Missing("amount")));
        assert_eq!(parse_positive_amount("0.0"), Err(ValidationError::NonPositiveAmount));
        assert!(parse_positive_amount("0.1").is_ok());
    }

    #[test]
    fn be_word_layout() {
        let word = BaseUnits::new(0x0102).to_be_word();
        assert_eq!(&word[..30], &[0u8; 30]);
        assert_eq!(&word[30..], &[0x01, 0x02]);
    }
}
