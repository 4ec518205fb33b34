//! Basis-point percentages and the validated slippage tolerance.

use core::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::AmmError;
use crate::math::div_round_u256;

/// Maximum value that represents 100%.
const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// All `u32` values are representable; [`SlippageTolerance`] is the
/// validated form used wherever a bound is computed.
///
/// # Examples
///
/// ```
/// use balancer_pool_core::domain::BasisPoints;
///
/// let bp = BasisPoints::new(30);
/// assert_eq!(bp.get(), 30);
/// assert!(bp.is_valid_percent());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

/// Maximum slippage the caller accepts, in basis points.
///
/// `0` means no slippage: every bound equals the expected amount.
/// Values above `10_000` are rejected with [`AmmError::InvalidTolerance`].
///
/// # Examples
///
/// ```
/// use balancer_pool_core::domain::{Amount, SlippageTolerance};
///
/// let tol = SlippageTolerance::new(100).expect("1% is valid");
/// assert_eq!(tol.shrink(Amount::new(500)).expect("ok"), Amount::new(495));
/// assert_eq!(tol.grow(Amount::new(500)).expect("ok"), Amount::new(505));
/// assert!(SlippageTolerance::new(10_001).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct SlippageTolerance(BasisPoints);

impl SlippageTolerance {
    /// No slippage allowed.
    pub const ZERO: Self = Self(BasisPoints::ZERO);

    /// Creates a validated tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidTolerance`] if `bps > 10_000`.
    pub const fn new(bps: u32) -> Result<Self, AmmError> {
        if bps > MAX_BPS {
            return Err(AmmError::InvalidTolerance(bps));
        }
        Ok(Self(BasisPoints::new(bps)))
    }

    /// Creates a tolerance from basis points, saturating at 100%.
    #[must_use]
    pub const fn from_basis_points(bps: BasisPoints) -> Self {
        if bps.is_valid_percent() {
            Self(bps)
        } else {
            Self(BasisPoints::MAX_PERCENT)
        }
    }

    /// Returns the tolerance in basis points.
    #[must_use]
    pub const fn bps(&self) -> u32 {
        self.0.get()
    }

    /// Returns `true` if no slippage is allowed.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.get() == 0
    }

    /// Upper bound for an amount the caller pays:
    /// `ceil(amount · (10_000 + t) / 10_000)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the bound exceeds `u128`.
    pub fn grow(&self, amount: Amount) -> Result<Amount, AmmError> {
        self.scale(amount, MAX_BPS + self.bps(), Rounding::Up)
    }

    /// Lower bound for an amount the caller receives:
    /// `floor(amount · (10_000 − t) / 10_000)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] only on internal conversion failure.
    pub fn shrink(&self, amount: Amount) -> Result<Amount, AmmError> {
        self.scale(amount, MAX_BPS - self.bps(), Rounding::Down)
    }

    fn scale(&self, amount: Amount, factor: u32, rounding: Rounding) -> Result<Amount, AmmError> {
        let product = U256::from(amount.get()) * U256::from(factor);
        let scaled = div_round_u256(product, U256::from(MAX_BPS), rounding)
            .ok_or(AmmError::DivisionByZero)?;
        if scaled > U256::from(u128::MAX) {
            return Err(AmmError::Overflow("slippage bound exceeds u128"));
        }
        Ok(Amount::new(scaled.as_u128()))
    }
}

impl TryFrom<u32> for SlippageTolerance {
    type Error = AmmError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Self::new(bps)
    }
}

impl<'de> Deserialize<'de> for SlippageTolerance {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bps = u32::deserialize(deserializer)?;
        Self::new(bps).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SlippageTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn tol(bps: u32) -> SlippageTolerance {
        let Ok(t) = SlippageTolerance::new(bps) else {
            panic!("valid tolerance");
        };
        t
    }

    #[test]
    fn basis_points_valid_range() {
        assert!(BasisPoints::ZERO.is_valid_percent());
        assert!(BasisPoints::MAX_PERCENT.is_valid_percent());
        assert!(!BasisPoints::new(10_001).is_valid_percent());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", BasisPoints::new(30)), "30bp");
        assert_eq!(format!("{}", tol(50)), "50bp");
    }

    #[test]
    fn tolerance_rejects_above_max() {
        let Err(AmmError::InvalidTolerance(v)) = SlippageTolerance::new(10_001) else {
            panic!("expected InvalidTolerance");
        };
        assert_eq!(v, 10_001);
    }

    #[test]
    fn tolerance_accepts_bounds() {
        assert!(SlippageTolerance::new(0).is_ok());
        assert!(SlippageTolerance::new(10_000).is_ok());
    }

    #[test]
    fn zero_tolerance_is_identity() {
        let t = SlippageTolerance::ZERO;
        let amount = Amount::new(123_456_789);
        assert_eq!(t.grow(amount), Ok(amount));
        assert_eq!(t.shrink(amount), Ok(amount));
    }

    #[test]
    fn one_percent_of_five_hundred() {
        assert_eq!(tol(100).shrink(Amount::new(500)), Ok(Amount::new(495)));
        assert_eq!(tol(100).grow(Amount::new(500)), Ok(Amount::new(505)));
    }

    #[test]
    fn grow_rounds_up_shrink_rounds_down() {
        // 1 · 1.003 = 1.003 → 2 when paying, 0.997 → 0 when receiving
        assert_eq!(tol(30).grow(Amount::new(1)), Ok(Amount::new(2)));
        assert_eq!(tol(30).shrink(Amount::new(1)), Ok(Amount::ZERO));
    }

    #[test]
    fn full_tolerance() {
        assert_eq!(tol(10_000).shrink(Amount::new(777)), Ok(Amount::ZERO));
        assert_eq!(tol(10_000).grow(Amount::new(777)), Ok(Amount::new(1_554)));
    }

    #[test]
    fn grow_overflow() {
        assert!(tol(1).grow(Amount::MAX).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let Ok(t) = serde_json::from_str::<SlippageTolerance>("50") else {
            panic!("expected Ok");
        };
        assert_eq!(t.bps(), 50);
        assert!(serde_json::from_str::<SlippageTolerance>("20000").is_err());
    }
}
