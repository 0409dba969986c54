//! Fixed-point monetary values
//!
//! Every amount handled by the SDK is a signed 64-bit integer scaled by
//! 10^8. Parsing and formatting work on the decimal text directly, so no
//! floating point ever touches a value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Number of decimal places carried by a [`Fixed64`]
pub const FIXED_PRECISION: u32 = 8;

/// Scale factor between a whole unit and the raw integer
pub const FIXED_SCALE: i64 = 100_000_000;

// =============================================================================
// Errors
// =============================================================================

/// Fixed-point parsing and arithmetic errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedError {
    #[error("Empty amount")]
    Empty,
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),
    #[error("Too many decimal places in {0} (max {})", FIXED_PRECISION)]
    TooPrecise(String),
    #[error("Amount out of range: {0}")]
    Overflow(String),
}

// =============================================================================
// Fixed64
// =============================================================================

/// Scaled-integer amount with [`FIXED_PRECISION`] decimal places
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed64(i64);

impl Fixed64 {
    pub const ZERO: Fixed64 = Fixed64(0);

    /// Wrap an already-scaled integer
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Whole units, e.g. `from_units(5)` is `5.00000000`
    pub fn from_units(units: i64) -> Option<Self> {
        units.checked_mul(FIXED_SCALE).map(Self)
    }

    /// The underlying scaled integer
    pub const fn raw(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Fixed64) -> Option<Fixed64> {
        self.0.checked_add(other.0).map(Fixed64)
    }

    pub fn checked_sub(self, other: Fixed64) -> Option<Fixed64> {
        self.0.checked_sub(other.0).map(Fixed64)
    }

    pub fn checked_mul_int(self, factor: i64) -> Option<Fixed64> {
        self.0.checked_mul(factor).map(Fixed64)
    }

    /// Split evenly across `count` parts, truncating toward zero.
    /// Returns `None` when `count` is zero.
    pub fn div_count(self, count: usize) -> Option<Fixed64> {
        let count = i64::try_from(count).ok()?;
        self.0.checked_div(count).map(Fixed64)
    }
}

impl FromStr for Fixed64 {
    type Err = FixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(FixedError::Empty);
        }

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !is_digits(int_part)
            || !is_digits(frac_part)
        {
            return Err(FixedError::InvalidFormat(s.to_string()));
        }
        if frac_part.len() > FIXED_PRECISION as usize {
            return Err(FixedError::TooPrecise(s.to_string()));
        }

        let overflow = || FixedError::Overflow(s.to_string());

        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };

        let mut frac: i64 = 0;
        for b in frac_part.bytes() {
            frac = frac * 10 + i64::from(b - b'0');
        }
        for _ in frac_part.len()..FIXED_PRECISION as usize {
            frac *= 10;
        }

        let raw = whole
            .checked_mul(FIXED_SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;

        Ok(Fixed64(if negative { -raw } else { raw }))
    }
}

impl fmt::Display for Fixed64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = FIXED_SCALE as u64;
        let whole = abs / scale;
        let frac = abs % scale;

        if frac == 0 {
            return write!(f, "{}{}", sign, whole);
        }

        let frac = format!("{:0width$}", frac, width = FIXED_PRECISION as usize);
        write!(f, "{}{}.{}", sign, whole, frac.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed64 {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(fx("1").raw(), 100_000_000);
        assert_eq!(fx("0.5").raw(), 50_000_000);
        assert_eq!(fx("12.3456").raw(), 1_234_560_000);
        assert_eq!(fx(".25").raw(), 25_000_000);
        assert_eq!(fx("0.00000001").raw(), 1);
        assert_eq!(fx("-2.5").raw(), -250_000_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Fixed64>(), Err(FixedError::Empty));
        assert!(matches!("abc".parse::<Fixed64>(), Err(FixedError::InvalidFormat(_))));
        assert!(matches!("1.2.3".parse::<Fixed64>(), Err(FixedError::InvalidFormat(_))));
        assert!(matches!(".".parse::<Fixed64>(), Err(FixedError::InvalidFormat(_))));
        assert!(matches!(
            "0.000000001".parse::<Fixed64>(),
            Err(FixedError::TooPrecise(_))
        ));
        assert!(matches!(
            "100000000000".parse::<Fixed64>(),
            Err(FixedError::Overflow(_))
        ));
    }

    #[test]
    fn test_display_trims_trailing_zeros() {
        assert_eq!(fx("49").to_string(), "49");
        assert_eq!(fx("0.5").to_string(), "0.5");
        assert_eq!(fx("12.3456").to_string(), "12.3456");
        assert_eq!(fx("-0.01").to_string(), "-0.01");
    }

    #[test]
    fn test_div_count_truncates() {
        assert_eq!(Fixed64::from_raw(10).div_count(3), Some(Fixed64::from_raw(3)));
        assert_eq!(Fixed64::from_raw(10).div_count(0), None);
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Fixed64::from_raw(i64::MAX);
        assert!(max.checked_add(Fixed64::from_raw(1)).is_none());
        assert_eq!(fx("3").checked_sub(fx("1")), Some(fx("2")));
        assert_eq!(Fixed64::from_units(5), Some(fx("5")));
    }
}
