//! Linear pool math.
//!
//! A linear pool values its main token at a "nominal" balance: inside
//! `[lower, upper]` nominal equals real, outside the band each unit past the
//! target is worth `1 + fee` (below) or `1 − fee` (above). The invariant is
//! `nominal(main) + wrapped`, with the wrapped balance already multiplied by
//! its rate. BPT is priced at `invariant / supply`.

use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};

/// Fee band of the main token, in upscaled units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NominalCurve {
    fee: FixedPoint,
    lower: FixedPoint,
    upper: FixedPoint,
}

impl NominalCurve {
    /// Creates a band.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `lower > upper` or the
    /// fee is not below one.
    pub fn new(fee: FixedPoint, lower: FixedPoint, upper: FixedPoint) -> Result<Self, AmmError> {
        if lower > upper {
            return Err(AmmError::InvalidConfiguration(
                "linear lower target exceeds upper target",
            ));
        }
        if fee >= FixedPoint::ONE {
            return Err(AmmError::InvalidConfiguration("swap fee must be below 1"));
        }
        Ok(Self { fee, lower, upper })
    }

    /// Nominal value of a real main balance. Fees round down.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] when the real balance is so far below
    /// the lower target that the nominal value would be negative.
    pub fn to_nominal(&self, real: FixedPoint) -> Result<FixedPoint, AmmError> {
        if real < self.lower {
            let fees = self.lower.safe_sub(&real)?.mul_down(self.fee)?;
            real.safe_sub(&fees)
        } else if real <= self.upper {
            Ok(real)
        } else {
            let fees = real.safe_sub(&self.upper)?.mul_down(self.fee)?;
            real.safe_sub(&fees)
        }
    }

    /// Real main balance of a nominal value; inverse of [`to_nominal`](Self::to_nominal).
    ///
    /// # Errors
    ///
    /// Propagates arithmetic failures.
    pub fn from_nominal(&self, nominal: FixedPoint) -> Result<FixedPoint, AmmError> {
        if nominal < self.lower {
            nominal
                .safe_add(&self.fee.mul_down(self.lower)?)?
                .div_down(FixedPoint::ONE.safe_add(&self.fee)?)
        } else if nominal <= self.upper {
            Ok(nominal)
        } else {
            nominal
                .safe_sub(&self.fee.mul_down(self.upper)?)?
                .div_down(self.fee.complement())
        }
    }

    /// `d nominal / d real` at a real main balance.
    ///
    /// # Errors
    ///
    /// Propagates arithmetic failures.
    pub fn marginal_main_value(&self, real: FixedPoint) -> Result<FixedPoint, AmmError> {
        if real < self.lower {
            FixedPoint::ONE.safe_add(&self.fee)
        } else if real < self.upper {
            Ok(FixedPoint::ONE)
        } else {
            Ok(self.fee.complement())
        }
    }

    /// `nominal(main) + wrapped`.
    ///
    /// # Errors
    ///
    /// See [`to_nominal`](Self::to_nominal).
    pub fn invariant(&self, main: FixedPoint, wrapped: FixedPoint) -> Result<FixedPoint, AmmError> {
        self.to_nominal(main)?.safe_add(&wrapped)
    }
}

/// BPT minted for depositing `main_in` and `wrapped_in` together.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] on an empty pool.
/// - Arithmetic failures from the nominal conversion.
pub fn bpt_out_given_exact_tokens_in(
    curve: &NominalCurve,
    main: FixedPoint,
    wrapped: FixedPoint,
    main_in: FixedPoint,
    wrapped_in: FixedPoint,
    supply: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let before = curve.invariant(main, wrapped)?;
    let after = curve.invariant(main.safe_add(&main_in)?, wrapped.safe_add(&wrapped_in)?)?;
    let delta = after.saturating_sub(before);
    supply.mul_down(delta)?.div_down(before)
}

/// BPT burned for withdrawing `main_out` and `wrapped_out`.
///
/// # Errors
///
/// - [`AmmError::ExceedsPoolBalance`] if an amount exceeds its balance.
/// - [`AmmError::DivisionByZero`] on an empty pool.
pub fn bpt_in_given_exact_tokens_out(
    curve: &NominalCurve,
    main: FixedPoint,
    wrapped: FixedPoint,
    main_out: FixedPoint,
    wrapped_out: FixedPoint,
    supply: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let new_main = main.safe_sub(&main_out).map_err(|_| AmmError::ExceedsPoolBalance)?;
    let new_wrapped = wrapped
        .safe_sub(&wrapped_out)
        .map_err(|_| AmmError::ExceedsPoolBalance)?;
    let before = curve.invariant(main, wrapped)?;
    let after = curve.invariant(new_main, new_wrapped)?;
    let delta = before.saturating_sub(after);
    supply.mul_up(delta)?.div_up(before)
}

/// Main tokens paid out for burning `bpt_in`.
///
/// # Errors
///
/// - [`AmmError::ExceedsPoolBalance`] if the share exceeds the nominal main
///   balance.
/// - [`AmmError::DivisionByZero`] for a zero supply.
pub fn main_out_given_exact_bpt_in(
    curve: &NominalCurve,
    main: FixedPoint,
    wrapped: FixedPoint,
    bpt_in: FixedPoint,
    supply: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let nominal_main = curve.to_nominal(main)?;
    let invariant = nominal_main.safe_add(&wrapped)?;
    let delta_nominal = invariant.mul_down(bpt_in)?.div_down(supply)?;
    let after_nominal = nominal_main
        .safe_sub(&delta_nominal)
        .map_err(|_| AmmError::ExceedsPoolBalance)?;
    let new_main = curve.from_nominal(after_nominal)?;
    Ok(main.saturating_sub(new_main))
}

/// Wrapped tokens paid out for burning `bpt_in`.
///
/// # Errors
///
/// - [`AmmError::ExceedsPoolBalance`] if the share exceeds the wrapped
///   balance.
/// - [`AmmError::DivisionByZero`] for a zero supply.
pub fn wrapped_out_given_exact_bpt_in(
    curve: &NominalCurve,
    main: FixedPoint,
    wrapped: FixedPoint,
    bpt_in: FixedPoint,
    supply: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let invariant = curve.invariant(main, wrapped)?;
    let out = invariant.mul_down(bpt_in)?.div_down(supply)?;
    if out > wrapped {
        return Err(AmmError::ExceedsPoolBalance);
    }
    Ok(out)
}

/// Value of one BPT in nominal units: `invariant / supply`.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] for a zero supply.
pub fn bpt_value(
    curve: &NominalCurve,
    main: FixedPoint,
    wrapped: FixedPoint,
    supply: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    curve.invariant(main, wrapped)?.div_down(supply)
}
