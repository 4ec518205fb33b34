//! Natural logarithm and exponential at 36-decimal internal precision.
//!
//! `ln` splits its argument as `2^k · m` with `m` in `[1, 2)` and sums the
//! `atanh` series for `ln m`. `exp` splits its argument as `k · ln 2 + r`
//! with `r` in `[0, ln 2)` and sums the Taylor series for `e^r`. Both work on
//! 36-decimal integers so that [`pow`] keeps well under the `1e-14` error
//! margin applied by [`FixedPoint::pow_down`](super::FixedPoint::pow_down).

use primitive_types::U256;
use tracing::trace;

use super::FixedPoint;
use crate::error::AmmError;

const ONE_18: u128 = 1_000_000_000_000_000_000;
const ONE_36: u128 = 1_000_000_000_000_000_000_000_000_000_000_000_000;

/// `ln 2` with 36 decimals.
const LN2_36: u128 = 693_147_180_559_945_309_417_232_121_458_176_568;

/// Largest `|x|` accepted by `exp`, 130 with 36 decimals. `e^130` still fits
/// the 18-decimal 256-bit range.
const MAX_EXP_ARGUMENT: u128 = 130 * ONE_36;

/// A signed 36-decimal value kept as sign and magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Signed36 {
    negative: bool,
    magnitude: U256,
}

/// `ln(x)` for an 18-decimal `x`, returned with 36 decimals.
fn ln_36(x: U256) -> Result<Signed36, AmmError> {
    if x.is_zero() {
        return Err(AmmError::InvalidAmount("logarithm of zero"));
    }
    let one = U256::from(ONE_36);
    let x36 = x
        .checked_mul(U256::from(ONE_18))
        .ok_or(AmmError::Overflow("ln argument too large"))?;

    // ln(x) = -ln(1/x) keeps the series argument >= 1
    let (negative, ratio) = if x36 >= one {
        (false, x36)
    } else {
        (true, one * one / x36)
    };

    let whole = ratio / one;
    let k = whole.bits().saturating_sub(1);
    let m = ratio >> k;

    let z = (m - one) * one / (m + one);
    let z_squared = z * z / one;
    let mut term = z;
    let mut series = U256::zero();
    let mut n = 1u64;
    while !term.is_zero() {
        series += term / U256::from(n);
        term = term * z_squared / one;
        n += 2;
    }
    trace!(k, terms = n / 2, "ln series");

    let magnitude = U256::from(LN2_36) * U256::from(k) + series * U256::from(2u8);
    Ok(Signed36 {
        negative: negative && !magnitude.is_zero(),
        magnitude,
    })
}

/// `e^x` for a 36-decimal `x`, returned with 18 decimals.
fn exp_18(x: Signed36) -> Result<U256, AmmError> {
    let one = U256::from(ONE_36);
    if x.magnitude > U256::from(MAX_EXP_ARGUMENT) {
        if x.negative {
            return Ok(U256::zero());
        }
        return Err(AmmError::Overflow("exp argument too large"));
    }
    let ln2 = U256::from(LN2_36);
    let k = (x.magnitude / ln2).as_usize();
    let r = x.magnitude - ln2 * U256::from(k);

    let mut term = one;
    let mut series = one;
    let mut n = 1u64;
    loop {
        term = term * r / one / U256::from(n);
        if term.is_zero() {
            break;
        }
        series += term;
        n += 1;
    }

    if x.negative {
        let inverse = one * one / series;
        Ok((inverse >> k) / U256::from(ONE_18))
    } else {
        Ok((series / U256::from(ONE_18)) << k)
    }
}

/// `x^y` for 18-decimal operands, without error margin.
pub(crate) fn pow(x: U256, y: U256) -> Result<U256, AmmError> {
    if y.is_zero() {
        return Ok(U256::from(ONE_18));
    }
    if x.is_zero() {
        return Ok(U256::zero());
    }
    let ln_x = ln_36(x)?;
    let magnitude = ln_x
        .magnitude
        .checked_mul(y)
        .ok_or(AmmError::Overflow("pow exponent too large"))?
        / U256::from(ONE_18);
    exp_18(Signed36 {
        negative: ln_x.negative,
        magnitude,
    })
}

/// Natural logarithm of `x`, as a signed 18-decimal integer.
///
/// # Errors
///
/// Returns [`AmmError::InvalidAmount`] for zero.
pub fn ln(x: FixedPoint) -> Result<i128, AmmError> {
    let value = ln_36(x.raw())?;
    let magnitude = i128::try_from((value.magnitude / U256::from(ONE_18)).as_u128())
        .map_err(|_| AmmError::Overflow("ln result exceeds i128"))?;
    Ok(if value.negative { -magnitude } else { magnitude })
}

/// `e^x` for a signed 18-decimal `x`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] for `x > 130`.
pub fn exp(x: i128) -> Result<FixedPoint, AmmError> {
    let magnitude = U256::from(x.unsigned_abs()) * U256::from(ONE_18);
    let raw = exp_18(Signed36 {
        negative: x < 0,
        magnitude,
    })?;
    Ok(FixedPoint::from_raw(raw))
}
