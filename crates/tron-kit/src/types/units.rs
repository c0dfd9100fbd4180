//! TRX amount type.

use std::fmt::{self, Display};
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseAmountError;

/// SUN per TRX (10^6).
const SUN_PER_TRX: i64 = 1_000_000;
/// Number of decimal places in one TRX.
const TRX_DECIMALS: usize = 6;

/// A TRX amount with SUN precision (10^-6 TRX).
///
/// Stored as a signed 64-bit SUN count, matching the `int64` the node uses
/// for balances, amounts and fees.
///
/// # Creating Amounts
///
/// ```
/// use tron_kit::Trx;
///
/// let five = Trx::trx(5);
/// let dust = Trx::sun(1);
/// assert_eq!(five.as_sun(), 5_000_000);
/// ```
///
/// # Parsing from Strings
///
/// - `"5 TRX"` or `"5 trx"` - whole TRX
/// - `"1.5 TRX"` - decimal TRX, at most 6 decimals
/// - `"100 sun"` or `"100 SUN"` - SUN
///
/// Raw numbers are NOT accepted to prevent unit confusion.
///
/// ```
/// use tron_kit::Trx;
///
/// let amount: Trx = "1.5 TRX".parse().unwrap();
/// assert_eq!(amount, Trx::sun(1_500_000));
/// assert!("100".parse::<Trx>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Trx(i64);

impl Trx {
    /// Zero TRX.
    pub const ZERO: Self = Self(0);
    /// One SUN.
    pub const ONE_SUN: Self = Self(1);
    /// One TRX.
    pub const ONE_TRX: Self = Self(SUN_PER_TRX);

    /// Create from whole TRX.
    pub const fn trx(trx: i64) -> Self {
        Self(trx * SUN_PER_TRX)
    }

    /// Create from SUN.
    pub const fn sun(sun: i64) -> Self {
        Self(sun)
    }

    /// Parse a decimal TRX value such as `"1.5"`.
    pub fn from_trx_decimal(s: &str) -> Result<Self, ParseAmountError> {
        let s = s.trim();
        let invalid = || ParseAmountError::InvalidNumber(s.to_string());

        let (integer_part, decimal_part) = match s.split_once('.') {
            Some((i, d)) => (i, d),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (integer_part.is_empty() && decimal_part.is_empty())
            || !all_digits(integer_part)
            || !all_digits(decimal_part)
            || decimal_part.len() > TRX_DECIMALS
        {
            return Err(invalid());
        }

        let integer: i64 = if integer_part.is_empty() {
            0
        } else {
            integer_part.parse().map_err(|_| ParseAmountError::Overflow)?
        };

        let decimal: i64 = if decimal_part.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", decimal_part, width = TRX_DECIMALS);
            padded.parse().map_err(|_| invalid())?
        };

        integer
            .checked_mul(SUN_PER_TRX)
            .and_then(|v| v.checked_add(decimal))
            .map(Self)
            .ok_or(ParseAmountError::Overflow)
    }

    /// Get the raw SUN value.
    pub const fn as_sun(&self) -> i64 {
        self.0
    }

    /// Get whole TRX (truncated).
    pub const fn as_trx(&self) -> i64 {
        self.0 / SUN_PER_TRX
    }

    /// Get the value as TRX (may lose precision).
    pub fn as_trx_f64(&self) -> f64 {
        self.0 as f64 / SUN_PER_TRX as f64
    }

    /// Checked addition.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Saturating addition.
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Check if zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if strictly positive.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl FromStr for Trx {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(value) = s.strip_suffix(" TRX").or_else(|| s.strip_suffix(" trx")) {
            return Self::from_trx_decimal(value);
        }

        if let Some(value) = s.strip_suffix(" sun").or_else(|| s.strip_suffix(" SUN")) {
            let value = value.trim();
            if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
                return Err(ParseAmountError::InvalidNumber(s.to_string()));
            }
            return value
                .parse()
                .map(Self)
                .map_err(|_| ParseAmountError::Overflow);
        }

        // Bare number = error (ambiguous)
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(ParseAmountError::AmbiguousAmount(s.to_string()));
        }

        Err(ParseAmountError::InvalidFormat(s.to_string()))
    }
}

impl TryFrom<&str> for Trx {
    type Error = ParseAmountError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for Trx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / SUN_PER_TRX as u64;
        let remainder = abs % SUN_PER_TRX as u64;

        if remainder == 0 {
            write!(f, "{}{} TRX", sign, whole)
        } else {
            let decimal = format!("{:06}", remainder);
            write!(
                f,
                "{}{}.{} TRX",
                sign,
                whole,
                decimal.trim_end_matches('0')
            )
        }
    }
}

impl Add for Trx {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Trx {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

// ============================================================================
// IntoTrx trait
// ============================================================================

/// Trait for types that can be converted into a [`Trx`] amount.
///
/// ```
/// use tron_kit::{IntoTrx, Trx};
///
/// fn example(amount: impl IntoTrx) -> Trx {
///     amount.into_trx().unwrap()
/// }
///
/// assert_eq!(example(Trx::trx(5)), example("5 TRX"));
/// ```
pub trait IntoTrx {
    /// Convert into a TRX amount.
    fn into_trx(self) -> Result<Trx, ParseAmountError>;
}

impl IntoTrx for Trx {
    fn into_trx(self) -> Result<Trx, ParseAmountError> {
        Ok(self)
    }
}

impl IntoTrx for &str {
    fn into_trx(self) -> Result<Trx, ParseAmountError> {
        self.parse()
    }
}

impl IntoTrx for String {
    fn into_trx(self) -> Result<Trx, ParseAmountError> {
        self.parse()
    }
}

impl IntoTrx for &String {
    fn into_trx(self) -> Result<Trx, ParseAmountError> {
        self.parse()
    }
}
