//! Fixed-point token amounts
//!
//! Amounts are exact integers scaled by the token's decimal count. All
//! comparisons happen on the integer representation; floating point is never
//! involved, so balance checks stay exact near thresholds.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a decimal string into an amount
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Input contained something other than digits and a single decimal point
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// More fractional digits than the token's decimal scale allows
    #[error("too many decimal places (max {0})")]
    TooManyDecimals(u8),

    /// Value does not fit the integer representation
    #[error("amount overflows the representable range")]
    Overflow,
}

/// Exact fixed-point token amount
///
/// `raw` is the integer value scaled by `10^decimals`. An `Amount` is never
/// negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    raw: u128,
    decimals: u8,
}

impl Amount {
    /// Create an amount from an already-scaled integer value
    pub fn from_raw(raw: u128, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Zero at the given scale
    pub fn zero(decimals: u8) -> Self {
        Self { raw: 0, decimals }
    }

    /// The maximum representable amount, used as the unlimited-approval
    /// sentinel so later swaps against the same spender need no new approval
    pub fn unlimited(decimals: u8) -> Self {
        Self {
            raw: u128::MAX,
            decimals,
        }
    }

    /// Parse a user-entered decimal string at the given scale
    ///
    /// Whitespace is trimmed and an empty string parses as zero (an empty
    /// input field means "nothing entered", not an error).
    pub fn parse(input: &str, decimals: u8) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::zero(decimals));
        }

        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };

        // "5." is accepted, ".5" is accepted, "." alone is not
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::InvalidNumber(input.to_string()));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AmountError::InvalidNumber(input.to_string()));
        }
        if frac_part.len() > decimals as usize {
            return Err(AmountError::TooManyDecimals(decimals));
        }

        let scale = 10u128
            .checked_pow(decimals as u32)
            .ok_or(AmountError::Overflow)?;
        let int_value: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| AmountError::Overflow)?
        };

        let mut raw = int_value.checked_mul(scale).ok_or(AmountError::Overflow)?;
        if !frac_part.is_empty() {
            let frac_scale = 10u128.pow((decimals as usize - frac_part.len()) as u32);
            let frac_value: u128 = frac_part.parse().map_err(|_| AmountError::Overflow)?;
            raw = raw
                .checked_add(frac_value * frac_scale)
                .ok_or(AmountError::Overflow)?;
        }

        Ok(Self { raw, decimals })
    }

    /// Canonical decimal string, trailing fractional zeros trimmed
    pub fn format(&self) -> String {
        let scale = 10u128.pow(self.decimals as u32);
        let int_part = self.raw / scale;
        let frac_part = self.raw % scale;
        if frac_part == 0 {
            return int_part.to_string();
        }
        let frac = format!("{:0width$}", frac_part, width = self.decimals as usize);
        format!("{}.{}", int_part, frac.trim_end_matches('0'))
    }

    /// The scaled integer value
    pub fn raw(&self) -> u128 {
        self.raw
    }

    /// Decimal scale of this amount
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Strict greater-than on the integer representation
    pub fn gt(&self, other: &Amount) -> bool {
        self.raw > other.raw
    }

    /// Less-than-or-equal on the integer representation
    pub fn lte(&self, other: &Amount) -> bool {
        self.raw <= other.raw
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_numbers() {
        let a = Amount::parse("50", 18).unwrap();
        assert_eq!(a.raw(), 50 * 10u128.pow(18));
        assert_eq!(Amount::parse("0", 6).unwrap(), Amount::zero(6));
    }

    #[test]
    fn test_parse_fractional() {
        let a = Amount::parse("12.5", 6).unwrap();
        assert_eq!(a.raw(), 12_500_000);
        let b = Amount::parse(".5", 2).unwrap();
        assert_eq!(b.raw(), 50);
        let c = Amount::parse("5.", 2).unwrap();
        assert_eq!(c.raw(), 500);
    }

    #[test]
    fn test_parse_empty_is_zero() {
        assert_eq!(Amount::parse("", 18).unwrap(), Amount::zero(18));
        assert_eq!(Amount::parse("   ", 18).unwrap(), Amount::zero(18));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Amount::parse("abc", 18),
            Err(AmountError::InvalidNumber(_))
        ));
        assert!(matches!(
            Amount::parse("1.2.3", 18),
            Err(AmountError::InvalidNumber(_))
        ));
        assert!(matches!(
            Amount::parse("-5", 18),
            Err(AmountError::InvalidNumber(_))
        ));
        assert!(matches!(
            Amount::parse(".", 18),
            Err(AmountError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert_eq!(
            Amount::parse("1.234", 2),
            Err(AmountError::TooManyDecimals(2))
        );
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let huge = "9".repeat(60);
        assert_eq!(Amount::parse(&huge, 18), Err(AmountError::Overflow));
    }

    #[test]
    fn test_format_round_trip() {
        for input in ["0", "1", "12.5", "0.000001", "100000", "3.14"] {
            let a = Amount::parse(input, 6).unwrap();
            assert_eq!(Amount::parse(&a.format(), 6).unwrap(), a);
        }
    }

    #[test]
    fn test_integer_comparisons() {
        let ten = Amount::parse("10", 6).unwrap();
        let fifty = Amount::parse("50", 6).unwrap();
        assert!(fifty.gt(&ten));
        assert!(!ten.gt(&fifty));
        assert!(ten.lte(&fifty));
        assert!(ten.lte(&ten));
        assert!(Amount::unlimited(6).gt(&fifty));
    }
}
