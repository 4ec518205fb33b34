//! Checked arithmetic trait for numeric wrapper types.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of panicking on overflow, underflow, or division by zero.
//!
//! # Implementations
//!
//! - [`Amount`]: raw token quantities (`u128`)
//! - [`FixedPoint`]: 18-decimal values (`U256`); multiplication and
//!   division use the fixed-point scale
//!
//! # Examples
//!
//! ```
//! use balancer_pool_core::domain::Amount;
//! use balancer_pool_core::math::CheckedArithmetic;
//!
//! let a = Amount::new(100);
//! let b = Amount::new(200);
//! assert_eq!(a.safe_add(&b), Ok(Amount::new(300)));
//! assert!(a.safe_sub(&b).is_err());
//! ```

use super::FixedPoint;
use crate::domain::{Amount, Rounding};
use crate::error::AmmError;

/// Fallible arithmetic for numeric wrapper types.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication, truncating any fractional part.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError>;
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(other)
            .ok_or(AmmError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError> {
        self.checked_div(other, rounding)
            .ok_or(AmmError::DivisionByZero)
    }
}

// ---------------------------------------------------------------------------
// FixedPoint
// ---------------------------------------------------------------------------

impl CheckedArithmetic for FixedPoint {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.raw()
            .checked_add(other.raw())
            .map(FixedPoint::from_raw)
            .ok_or(AmmError::Overflow("fixed-point addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.raw()
            .checked_sub(other.raw())
            .map(FixedPoint::from_raw)
            .ok_or(AmmError::Underflow("fixed-point subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.mul_down(*other)
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError> {
        self.div_round(*other, rounding)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    mod amount {
        use super::*;

        #[test]
        fn add_ok() {
            let Ok(r) = Amount::new(100).safe_add(&Amount::new(200)) else {
                panic!("expected Ok");
            };
            assert_eq!(r, Amount::new(300));
        }

        #[test]
        fn add_overflow() {
            let Err(AmmError::Overflow(_)) = Amount::MAX.safe_add(&Amount::new(1)) else {
                panic!("expected Overflow");
            };
        }

        #[test]
        fn sub_underflow() {
            let Err(AmmError::Underflow(_)) = Amount::new(1).safe_sub(&Amount::new(2)) else {
                panic!("expected Underflow");
            };
        }

        #[test]
        fn mul_overflow() {
            assert!(Amount::MAX.safe_mul(&Amount::new(2)).is_err());
        }

        #[test]
        fn div_by_zero() {
            assert_eq!(
                Amount::new(10).safe_div(&Amount::ZERO, Rounding::Up),
                Err(AmmError::DivisionByZero)
            );
        }

        #[test]
        fn div_rounding() {
            let Ok(up) = Amount::new(10).safe_div(&Amount::new(4), Rounding::Up) else {
                panic!("expected Ok");
            };
            assert_eq!(up, Amount::new(3));
        }
    }

    mod fixed_point {
        use super::*;

        #[test]
        fn add_sub() {
            let Ok(sum) = FixedPoint::ONE.safe_add(&FixedPoint::ONE) else {
                panic!("expected Ok");
            };
            assert_eq!(sum, FixedPoint::TWO);
            let Err(AmmError::Underflow(_)) = FixedPoint::ONE.safe_sub(&FixedPoint::TWO) else {
                panic!("expected Underflow");
            };
        }

        #[test]
        fn mul_and_div_use_scale() {
            assert_eq!(FixedPoint::TWO.safe_mul(&FixedPoint::TWO), Ok(FixedPoint::FOUR));
            assert_eq!(
                FixedPoint::FOUR.safe_div(&FixedPoint::TWO, Rounding::Down),
                Ok(FixedPoint::TWO)
            );
        }
    }
}
