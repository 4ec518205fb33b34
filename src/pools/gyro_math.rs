//! Gyroscope concentrated-liquidity math.
//!
//! Both curves are constant-product curves over virtual reserves: real
//! balances shifted by an offset proportional to the invariant `L`.
//!
//! ```text
//! 2-CLP: (x + L/√β)(y + L·√α) = L²
//! 3-CLP: (x + L·r)(y + L·r)(z + L·r) = L³,   r = α^(1/3)
//! ```
//!
//! Marginal values follow from the virtual reserves: on a product curve
//! token `i` trades against token `j` at `X_j / X_i`.

use tracing::{trace, warn};

use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};

/// Iteration cap of the 3-CLP invariant solver.
pub const GYRO_MAX_ITERATIONS: u32 = 255;

/// Invariant of a 2-CLP, the positive root of
/// `a·L² − b·L − x·y = 0` with `a = 1 − √α/√β` and `b = x·√α + y/√β`.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] if `sqrt_alpha >= sqrt_beta`.
/// - Arithmetic failures.
pub fn two_clp_invariant(
    x: FixedPoint,
    y: FixedPoint,
    sqrt_alpha: FixedPoint,
    sqrt_beta: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    if sqrt_alpha >= sqrt_beta {
        return Err(AmmError::InvalidConfiguration("malformed gyro parameters"));
    }
    let a = sqrt_alpha.div_up(sqrt_beta)?.complement();
    let b = x.mul_down(sqrt_alpha)?.safe_add(&y.div_down(sqrt_beta)?)?;
    let four_ac = FixedPoint::from_integer(4).mul_down(a)?.mul_down(x.mul_down(y)?)?;
    let root = b.mul_down(b)?.safe_add(&four_ac)?.sqrt();
    b.safe_add(&root)?.div_down(a.mul_up(FixedPoint::from_integer(2))?)
}

/// Marginal values `[Y/X, 1]` of a 2-CLP, in units of the second token.
///
/// # Errors
///
/// See [`two_clp_invariant`].
pub fn two_clp_values(
    x: FixedPoint,
    y: FixedPoint,
    sqrt_alpha: FixedPoint,
    sqrt_beta: FixedPoint,
) -> Result<[FixedPoint; 2], AmmError> {
    let invariant = two_clp_invariant(x, y, sqrt_alpha, sqrt_beta)?;
    let virtual_x = x.safe_add(&invariant.div_down(sqrt_beta)?)?;
    let virtual_y = y.safe_add(&invariant.mul_down(sqrt_alpha)?)?;
    Ok([virtual_y.div_down(virtual_x)?, FixedPoint::ONE])
}

/// Signed value kept as magnitude and sign; the 3-CLP cubic changes sign
/// around its root.
#[derive(Debug, Clone, Copy)]
struct Signed {
    magnitude: FixedPoint,
    negative: bool,
}

impl Signed {
    fn difference(positive: FixedPoint, negative: FixedPoint) -> Self {
        if positive >= negative {
            Self {
                magnitude: positive.saturating_sub(negative),
                negative: false,
            }
        } else {
            Self {
                magnitude: negative.saturating_sub(positive),
                negative: true,
            }
        }
    }
}

/// Invariant of a 3-CLP, by Newton's method on
/// `(1 − r³)·L³ − r²·S·L² − r·P₂·L − P₃ = 0`, started from the
/// balanced-pool root `S / (3·(1 − r))`, which bounds the root from above.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] unless exactly three balances are
///   given and `0 < r < 1`.
/// - [`AmmError::InvariantDidNotConverge`] after [`GYRO_MAX_ITERATIONS`].
pub fn three_clp_invariant(
    balances: &[FixedPoint],
    root3_alpha: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let [x, y, z] = balances else {
        return Err(AmmError::InvalidConfiguration("3-CLP pools hold three tokens"));
    };
    if root3_alpha.is_zero() || root3_alpha >= FixedPoint::ONE {
        return Err(AmmError::InvalidConfiguration("malformed gyro parameters"));
    }
    let r = root3_alpha;
    let sum = x.safe_add(y)?.safe_add(z)?;
    let p2 = x
        .mul_down(*y)?
        .safe_add(&y.mul_down(*z)?)?
        .safe_add(&z.mul_down(*x)?)?;
    let p3 = x.mul_down(*y)?.mul_down(*z)?;
    let r2 = r.mul_down(r)?;
    let a = r2.mul_up(r)?.complement();
    let b = r2.mul_down(sum)?;
    let c = r.mul_down(p2)?;

    let mut invariant = sum.div_up(FixedPoint::from_integer(3).mul_down(r.complement())?)?;
    for iteration in 0..GYRO_MAX_ITERATIONS {
        let l2 = invariant.mul_down(invariant)?;
        let l3 = l2.mul_down(invariant)?;
        let value = Signed::difference(
            a.mul_down(l3)?,
            b.mul_down(l2)?.safe_add(&c.mul_down(invariant)?)?.safe_add(&p3)?,
        );
        let slope = FixedPoint::from_integer(3)
            .mul_down(a)?
            .mul_down(l2)?
            .safe_sub(&FixedPoint::from_integer(2).mul_down(b)?.mul_down(invariant)?)
            .and_then(|s| s.safe_sub(&c))
            .map_err(|_| AmmError::InvariantDidNotConverge("3-CLP invariant"))?;
        if slope.is_zero() {
            return Err(AmmError::InvariantDidNotConverge("3-CLP invariant"));
        }
        let step = value.magnitude.div_down(slope)?;
        if step <= FixedPoint::from_raw_u128(1) {
            trace!(iteration, %invariant, "3-CLP invariant converged");
            return Ok(invariant);
        }
        invariant = if value.negative {
            invariant.safe_add(&step)?
        } else {
            invariant.safe_sub(&step)?
        };
    }
    warn!(
        max_iterations = GYRO_MAX_ITERATIONS,
        "3-CLP invariant did not converge"
    );
    Err(AmmError::InvariantDidNotConverge("3-CLP invariant"))
}

/// Marginal values `L / X_i` of a 3-CLP, with `X_i = x_i + L·r`.
///
/// # Errors
///
/// See [`three_clp_invariant`].
pub fn three_clp_values(
    balances: &[FixedPoint],
    root3_alpha: FixedPoint,
) -> Result<Vec<FixedPoint>, AmmError> {
    let invariant = three_clp_invariant(balances, root3_alpha)?;
    let offset = invariant.mul_down(root3_alpha)?;
    balances
        .iter()
        .map(|b| invariant.div_down(b.safe_add(&offset)?))
        .collect()
}

/// Price of `index_out` in units of `index_in`: `v_out / v_in / (1 − fee)`.
///
/// # Errors
///
/// - [`AmmError::InvalidToken`] for out-of-range indices.
/// - [`AmmError::DivisionByZero`] for a zero value or a fee of one.
pub fn spot_price(
    values: &[FixedPoint],
    index_in: usize,
    index_out: usize,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let (Some(v_in), Some(v_out)) = (values.get(index_in), values.get(index_out)) else {
        return Err(AmmError::InvalidToken("token index out of range"));
    };
    v_out.div_up(*v_in)?.div_up(swap_fee.complement())
}

/// BPT worth `amounts` at marginal values: `supply · Σ aᵢ·vᵢ / Σ Bᵢ·vᵢ`.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] on mismatched lengths.
/// - [`AmmError::DivisionByZero`] for an empty pool.
pub fn bpt_zero_price_impact(
    balances: &[FixedPoint],
    values: &[FixedPoint],
    amounts: &[FixedPoint],
    supply: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    if balances.len() != values.len() || balances.len() != amounts.len() {
        return Err(AmmError::InvalidConfiguration(
            "balances, values and amounts must have equal length",
        ));
    }
    let mut added = FixedPoint::ZERO;
    let mut held = FixedPoint::ZERO;
    for ((balance, value), amount) in balances.iter().zip(values).zip(amounts) {
        added = added.safe_add(&amount.mul_down(*value)?)?;
        held = held.safe_add(&balance.mul_down(*value)?)?;
    }
    supply.mul_down(added)?.div_down(held)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn fp(s: &str) -> FixedPoint {
        let Ok(v) = s.parse() else {
            panic!("bad literal {s}");
        };
        v
    }

    fn close(actual: FixedPoint, expected: FixedPoint, tolerance: &str) -> bool {
        let diff = if actual > expected {
            actual.saturating_sub(expected)
        } else {
            expected.saturating_sub(actual)
        };
        diff <= fp(tolerance)
    }

    #[test]
    fn two_clp_symmetric_range_prices_at_one() {
        // √α·√β = 1 and equal balances: the pool sits at price 1
        let Ok([vx, vy]) = two_clp_values(fp("1000"), fp("1000"), fp("0.9"), fp("1.111111111111111111")) else {
            panic!("values");
        };
        assert_eq!(vy, FixedPoint::ONE);
        assert!(close(vx, FixedPoint::ONE, "0.000000001"), "got {vx}");
    }

    #[test]
    fn two_clp_invariant_satisfies_curve() {
        let (x, y, sa, sb) = (fp("500"), fp("2000"), fp("1.2"), fp("2.5"));
        let Ok(l) = two_clp_invariant(x, y, sa, sb) else {
            panic!("invariant");
        };
        let (Ok(shift_x), Ok(shift_y)) = (l.div_down(sb), l.mul_down(sa)) else {
            panic!("offsets");
        };
        let (Ok(vx), Ok(vy)) = (x.safe_add(&shift_x), y.safe_add(&shift_y)) else {
            panic!("virtual reserves");
        };
        let Ok(lhs) = vx.mul_down(vy) else {
            panic!("curve");
        };
        let Ok(rhs) = l.mul_down(l) else {
            panic!("square");
        };
        assert!(close(lhs, rhs, "0.0001"), "{lhs} vs {rhs}");
    }

    #[test]
    fn two_clp_rejects_inverted_range() {
        assert!(two_clp_invariant(fp("1"), fp("1"), fp("2"), fp("1")).is_err());
    }

    #[test]
    fn three_clp_balanced_root_is_exact() {
        let balances = [fp("1000"), fp("1000"), fp("1000")];
        let Ok(l) = three_clp_invariant(&balances, fp("0.99")) else {
            panic!("invariant");
        };
        // t / (1 − r) = 1000 / 0.01
        assert!(close(l, fp("100000"), "0.000001"), "got {l}");
    }

    #[test]
    fn three_clp_values_favour_scarce_token() {
        let balances = [fp("900"), fp("1000"), fp("1100")];
        let Ok(values) = three_clp_values(&balances, fp("0.99")) else {
            panic!("values");
        };
        let (Some(scarce), Some(plenty)) = (values.first(), values.get(2)) else {
            panic!("three values");
        };
        assert!(scarce > plenty);
        let Ok(p) = spot_price(&values, 2, 0, FixedPoint::ZERO) else {
            panic!("price");
        };
        assert!(p > FixedPoint::ONE);
    }

    #[test]
    fn three_clp_needs_three_balances() {
        assert!(matches!(
            three_clp_invariant(&[fp("1"), fp("1")], fp("0.9")),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_impact_of_proportional_amounts() {
        let balances = [fp("100"), fp("300")];
        let values = [fp("3"), FixedPoint::ONE];
        let Ok(bpt) = bpt_zero_price_impact(&balances, &values, &[fp("1"), fp("3")], fp("600")) else {
            panic!("zero impact");
        };
        assert_eq!(bpt, fp("6"));
    }
}
