//! 18-decimal unsigned fixed-point numbers over 256-bit integers.
//!
//! Every multiplication and division names its rounding direction in the
//! method name (`mul_down`, `div_up`, ...). Down truncates, Up rounds away
//! from zero. Nothing rounds implicitly.
//!
//! # Examples
//!
//! ```
//! use balancer_pool_core::math::FixedPoint;
//!
//! let half: FixedPoint = "0.5".parse().expect("valid");
//! let three: FixedPoint = "3".parse().expect("valid");
//! assert_eq!(three.mul_down(half).expect("ok").to_string(), "1.5");
//! assert_eq!(FixedPoint::ONE.div_up(three).expect("ok").to_string(), "0.333333333333333334");
//! ```

use core::fmt;
use core::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{log_exp, CheckedArithmetic};
use crate::domain::Rounding;
use crate::error::AmmError;

/// `10^18`, the raw representation of `1.0`.
const ONE_RAW: u64 = 1_000_000_000_000_000_000;

/// Number of fractional decimal digits.
const DECIMALS: usize = 18;

/// Relative error bound of [`FixedPoint::pow_down`] / [`FixedPoint::pow_up`],
/// `1e-14` in 18-decimal units.
pub const MAX_POW_RELATIVE_ERROR: FixedPoint = FixedPoint::from_raw_u128(10_000);

/// Unsigned 18-decimal fixed-point value.
///
/// Serialized as a decimal string (`"0.003"`), matching the way pool
/// snapshots carry fees and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct FixedPoint(U256);

impl FixedPoint {
    /// `0.0`
    pub const ZERO: Self = Self(U256([0, 0, 0, 0]));

    /// `1.0`
    pub const ONE: Self = Self(U256([ONE_RAW, 0, 0, 0]));

    /// `2.0`
    pub const TWO: Self = Self(U256([2 * ONE_RAW, 0, 0, 0]));

    /// `4.0`
    pub const FOUR: Self = Self(U256([4 * ONE_RAW, 0, 0, 0]));

    /// Wraps a raw 18-decimal integer.
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Wraps a raw 18-decimal integer given as `u128`.
    pub const fn from_raw_u128(raw: u128) -> Self {
        Self(U256([raw as u64, (raw >> 64) as u64, 0, 0]))
    }

    /// Converts a whole number to fixed point (`n · 10^18`).
    pub fn from_integer(n: u128) -> Self {
        Self(U256::from(n) * U256::from(ONE_RAW))
    }

    /// Returns the raw 18-decimal integer.
    #[must_use]
    pub const fn raw(&self) -> U256 {
        self.0
    }

    /// Returns the raw integer as `u128`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if it does not fit.
    pub fn raw_u128(&self) -> Result<u128, AmmError> {
        if self.0 > U256::from(u128::MAX) {
            return Err(AmmError::Overflow("fixed-point value exceeds u128"));
        }
        Ok(self.0.as_u128())
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtraction clamped at zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// `a · b`, truncated.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the intermediate product overflows.
    pub fn mul_down(self, other: Self) -> Result<Self, AmmError> {
        let product = self.product(other)?;
        Ok(Self(product / U256::from(ONE_RAW)))
    }

    /// `a · b`, rounded up.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the intermediate product overflows.
    pub fn mul_up(self, other: Self) -> Result<Self, AmmError> {
        let product = self.product(other)?;
        if product.is_zero() {
            return Ok(Self::ZERO);
        }
        Ok(Self((product - U256::one()) / U256::from(ONE_RAW) + U256::one()))
    }

    /// `a / b`, truncated.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero, or
    /// [`AmmError::Overflow`] if `a · 10^18` overflows.
    pub fn div_down(self, other: Self) -> Result<Self, AmmError> {
        if other.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        let inflated = self.inflate()?;
        Ok(Self(inflated / other.0))
    }

    /// `a / b`, rounded up.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero, or
    /// [`AmmError::Overflow`] if `a · 10^18` overflows.
    pub fn div_up(self, other: Self) -> Result<Self, AmmError> {
        if other.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        let inflated = self.inflate()?;
        Ok(Self((inflated - U256::one()) / other.0 + U256::one()))
    }

    /// Multiplication with a runtime rounding direction.
    ///
    /// # Errors
    ///
    /// See [`mul_down`](Self::mul_down).
    pub fn mul_round(self, other: Self, rounding: Rounding) -> Result<Self, AmmError> {
        match rounding {
            Rounding::Up => self.mul_up(other),
            Rounding::Down => self.mul_down(other),
        }
    }

    /// Division with a runtime rounding direction.
    ///
    /// # Errors
    ///
    /// See [`div_down`](Self::div_down).
    pub fn div_round(self, other: Self, rounding: Rounding) -> Result<Self, AmmError> {
        match rounding {
            Rounding::Up => self.div_up(other),
            Rounding::Down => self.div_down(other),
        }
    }

    /// `1 - x`, clamped at zero.
    pub fn complement(self) -> Self {
        Self::ONE.saturating_sub(self)
    }

    /// `x^y` rounded down, within [`MAX_POW_RELATIVE_ERROR`].
    ///
    /// Exponents `1`, `2` and `4` take exact multiplication paths.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result leaves the supported
    /// range.
    pub fn pow_down(self, exponent: Self) -> Result<Self, AmmError> {
        if exponent == Self::ONE {
            return Ok(self);
        }
        if exponent == Self::TWO {
            return self.mul_down(self);
        }
        if exponent == Self::FOUR {
            let square = self.mul_down(self)?;
            return square.mul_down(square);
        }
        let raw = Self(log_exp::pow(self.0, exponent.0)?);
        let max_error = raw.mul_up(MAX_POW_RELATIVE_ERROR)?.safe_add(&Self::from_raw_u128(1))?;
        Ok(raw.saturating_sub(max_error))
    }

    /// `x^y` rounded up, within [`MAX_POW_RELATIVE_ERROR`].
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result leaves the supported
    /// range.
    pub fn pow_up(self, exponent: Self) -> Result<Self, AmmError> {
        if exponent == Self::ONE {
            return Ok(self);
        }
        if exponent == Self::TWO {
            return self.mul_up(self);
        }
        if exponent == Self::FOUR {
            let square = self.mul_up(self)?;
            return square.mul_up(square);
        }
        let raw = Self(log_exp::pow(self.0, exponent.0)?);
        let max_error = raw.mul_up(MAX_POW_RELATIVE_ERROR)?.safe_add(&Self::from_raw_u128(1))?;
        raw.safe_add(&max_error)
    }

    /// Square root, rounded down.
    pub fn sqrt(self) -> Self {
        // sqrt(x · 10^18) keeps 18 decimals; x · 10^18 may exceed 256 bits
        let one = U256::from(ONE_RAW);
        match self.0.checked_mul(one) {
            Some(inflated) => Self(isqrt(inflated)),
            None => Self(isqrt(self.0) * U256::from(1_000_000_000u64)),
        }
    }

    fn product(self, other: Self) -> Result<U256, AmmError> {
        self.0
            .checked_mul(other.0)
            .ok_or(AmmError::Overflow("fixed-point multiplication overflow"))
    }

    fn inflate(self) -> Result<U256, AmmError> {
        self.0
            .checked_mul(U256::from(ONE_RAW))
            .ok_or(AmmError::Overflow("fixed-point division overflow"))
    }
}

/// Integer square root (Newton's method), rounded down.
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    let mut x = n;
    let mut y = (x >> 1) + (x & U256::one());
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int, frac) = self.0.div_mod(U256::from(ONE_RAW));
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = DECIMALS);
        write!(f, "{int}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for FixedPoint {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const MALFORMED: AmmError = AmmError::InvalidAmount("expected a non-negative decimal");
        let s = s.trim();
        let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(MALFORMED);
        }
        if frac_part.len() > DECIMALS {
            return Err(AmmError::InvalidAmount("more than 18 fractional digits"));
        }
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(MALFORMED);
        }
        let int = if int_part.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(int_part).map_err(|_| MALFORMED)?
        };
        let frac = if frac_part.is_empty() {
            U256::zero()
        } else {
            let padded = format!("{frac_part:0<width$}", width = DECIMALS);
            U256::from_dec_str(&padded).map_err(|_| MALFORMED)?
        };
        int.checked_mul(U256::from(ONE_RAW))
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or(AmmError::Overflow("decimal exceeds 256-bit range"))
    }
}

impl Serialize for FixedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FixedPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
