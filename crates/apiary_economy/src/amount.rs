//! # Token Amounts
//!
//! **CRITICAL: NO FLOATING POINT IN PROFIT CALCULATIONS**
//!
//! Every profit rate and accrued yield is an `Amount`: an 18-decimal
//! fixed-point number stored as raw wei in a `u128`. Ethereum-style tokens
//! use 18 decimals, so amounts computed here can be handed to the custody
//! layer without conversion or dust.
//!
//! Division always truncates. Callers reproducing the accrual formula must
//! truncate at the same steps to get bit-identical results.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LandError, LandResult};

/// Number of decimal places.
const DECIMALS: u32 = 18;

/// 10^18, one whole token in wei.
const WEI_PER_TOKEN: u128 = 10u128.pow(DECIMALS);

/// Fixed-point token amount with 18 decimal places.
///
/// # Range
///
/// - Minimum: 0.000000000000000000
/// - Maximum: 340,282,366,920,938,463,463.374607431768211455
///
/// # Config Format
///
/// Serialized as a decimal string (`"12.5"`, `"1000"`) so TOML files are not
/// limited to 64-bit integers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(transparent)]
pub struct Amount(u128);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One whole token.
    pub const ONE: Self = Self(WEI_PER_TOKEN);

    /// Maximum representable value.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates from a whole number of tokens.
    ///
    /// Saturates at `Amount::MAX`.
    #[inline]
    #[must_use]
    pub const fn from_whole(whole: u128) -> Self {
        Self(whole.saturating_mul(WEI_PER_TOKEN))
    }

    /// Creates from raw wei.
    #[inline]
    #[must_use]
    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    /// Returns the raw wei value.
    #[inline]
    #[must_use]
    pub const fn to_wei(self) -> u128 {
        self.0
    }

    /// Whole-token part.
    #[inline]
    #[must_use]
    pub const fn whole(self) -> u128 {
        self.0 / WEI_PER_TOKEN
    }

    /// Fractional part in wei (0 to 10^18 - 1).
    #[inline]
    #[must_use]
    pub const fn decimal(self) -> u128 {
        self.0 % WEI_PER_TOKEN
    }

    /// Returns true if zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication by an integer.
    #[inline]
    #[must_use]
    pub const fn checked_mul_int(self, rhs: u128) -> Option<Self> {
        match self.0.checked_mul(rhs) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked truncating division by an integer.
    #[inline]
    #[must_use]
    pub const fn checked_div_int(self, rhs: u128) -> Option<Self> {
        if rhs == 0 {
            None
        } else {
            Some(Self(self.0 / rhs))
        }
    }

    /// Scales by `numerator / denominator`, multiplying first and truncating once.
    ///
    /// # Errors
    ///
    /// Returns `LandError::ArithmeticOverflow` on overflow or a zero denominator.
    #[inline]
    pub fn mul_div(self, numerator: u128, denominator: u128) -> LandResult<Self> {
        self.checked_mul_int(numerator)
            .and_then(|v| v.checked_div_int(denominator))
            .ok_or(LandError::ArithmeticOverflow)
    }

    /// Safe addition with error.
    ///
    /// # Errors
    ///
    /// Returns `LandError::ArithmeticOverflow` if the sum overflows.
    #[inline]
    pub fn safe_add(self, rhs: Self) -> LandResult<Self> {
        self.checked_add(rhs).ok_or(LandError::ArithmeticOverflow)
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Add for Amount {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({}.{:018})", self.whole(), self.decimal())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.whole(), self.decimal())
    }
}

impl FromStr for Amount {
    type Err = LandError;

    /// Parses `"<whole>"` or `"<whole>.<fraction>"` with at most 18 fraction digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LandError::InvalidConfig(format!("invalid amount: {s:?}"));

        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || s.ends_with('.')
            || !fraction.bytes().all(|b| b.is_ascii_digit())
            || fraction.len() > DECIMALS as usize
        {
            return Err(invalid());
        }

        let whole: u128 = whole.parse().map_err(|_| invalid())?;
        let mut fraction_wei: u128 = 0;
        if !fraction.is_empty() {
            let digits: u128 = fraction.parse().map_err(|_| invalid())?;
            // Right-pad to 18 digits: "5" -> 500000000000000000
            fraction_wei = digits * 10u128.pow(DECIMALS - fraction.len() as u32);
        }

        whole
            .checked_mul(WEI_PER_TOKEN)
            .and_then(|w| w.checked_add(fraction_wei))
            .map(Self)
            .ok_or(LandError::ArithmeticOverflow)
    }
}

impl TryFrom<String> for Amount {
    type Error = LandError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}
