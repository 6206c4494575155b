//! # Price
//!
//! Exact two-decimal money amount stored as integer minor units.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use thiserror::Error;

/// Fractional digits kept by a price
pub const DECIMAL_PLACES: i64 = 2;

/// Total significant digits allowed (integer + fractional)
pub const MAX_DIGITS: u32 = 10;

/// Longest textual amount worth handing to the decimal parser
const MAX_INPUT_LENGTH: usize = 64;

/// Reasons a textual amount is not a valid price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("A valid number is required.")]
    Invalid,

    #[error("Ensure that there are no more than {} decimal places.", DECIMAL_PLACES)]
    TooManyDecimalPlaces,

    #[error("Ensure that there are no more than {} digits in total.", MAX_DIGITS)]
    TooManyDigits,
}

/// A decimal amount with exactly two fractional digits.
///
/// Negative values are representable so range filters can use them;
/// the write path rejects them for stored products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    cents: i64,
}

impl Price {
    pub const ZERO: Price = Price { cents: 0 };

    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Parse a decimal string such as `"99.99"`, `"0"` or `"1e2"`.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Invalid);
        }
        if trimmed.len() > MAX_INPUT_LENGTH {
            return Err(PriceError::TooManyDigits);
        }

        let value = BigDecimal::from_str(trimmed).map_err(|_| PriceError::Invalid)?;

        let (_, scale) = value.as_bigint_and_exponent();
        if scale > DECIMAL_PLACES {
            return Err(PriceError::TooManyDecimalPlaces);
        }
        if value.is_zero() {
            return Ok(Price::ZERO);
        }

        // Bound the integer part before rescaling; a large exponent would
        // otherwise expand into a huge integer.
        let integer_digits = (value.digits() as i64).saturating_sub(scale);
        if integer_digits > i64::from(MAX_DIGITS) - DECIMAL_PLACES {
            return Err(PriceError::TooManyDigits);
        }

        let (minor_units, _) = value.with_scale(DECIMAL_PLACES).as_bigint_and_exponent();
        let cents = minor_units.to_i64().ok_or(PriceError::TooManyDigits)?;
        if cents.unsigned_abs() >= 10u64.pow(MAX_DIGITS) {
            return Err(PriceError::TooManyDigits);
        }

        Ok(Self { cents })
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Price::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_decimals() {
        let price = Price::parse("99.99").unwrap();
        assert_eq!(price.cents(), 9999);
        assert_eq!(price.to_string(), "99.99");
    }

    #[test]
    fn test_parse_pads_fraction() {
        assert_eq!(Price::parse("10").unwrap().to_string(), "10.00");
        assert_eq!(Price::parse("10.5").unwrap().to_string(), "10.50");
        assert_eq!(Price::parse(" 0.00 ").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_negative() {
        let price = Price::parse("-10.00").unwrap();
        assert!(price.is_negative());
        assert_eq!(price.to_string(), "-10.00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Price::parse("abc"), Err(PriceError::Invalid));
        assert_eq!(Price::parse(""), Err(PriceError::Invalid));
        assert_eq!(Price::parse("NaN"), Err(PriceError::Invalid));
    }

    #[test]
    fn test_parse_rejects_extra_decimal_places() {
        assert_eq!(Price::parse("1.999"), Err(PriceError::TooManyDecimalPlaces));
    }

    #[test]
    fn test_parse_rejects_too_many_digits() {
        assert!(Price::parse("99999999.99").is_ok());
        assert_eq!(Price::parse("100000000.00"), Err(PriceError::TooManyDigits));
    }

    #[test]
    fn test_parse_rejects_large_exponents() {
        assert_eq!(Price::parse("1e8"), Err(PriceError::TooManyDigits));
        assert_eq!(Price::parse("1e6000000"), Err(PriceError::TooManyDigits));
        assert_eq!(Price::parse("-1e999999999"), Err(PriceError::TooManyDigits));
        assert_eq!(Price::parse("1e7").unwrap().to_string(), "10000000.00");
        assert_eq!(Price::parse("0e6000000").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_rejects_overlong_input() {
        let long = format!("1.{}", "0".repeat(100));
        assert_eq!(Price::parse(&long), Err(PriceError::TooManyDigits));
    }

    #[test]
    fn test_ordering_follows_amount() {
        let cheap = Price::parse("10.00").unwrap();
        let dear = Price::parse("100.00").unwrap();
        assert!(cheap < dear);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PriceError::TooManyDecimalPlaces.to_string(),
            "Ensure that there are no more than 2 decimal places."
        );
    }
}
