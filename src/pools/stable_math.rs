//! StableSwap invariant math for N tokens.
//!
//! # Invariant
//!
//! ```text
//! A·nⁿ·Σxᵢ + D = A·D·nⁿ + Dⁿ⁺¹ / (nⁿ·∏xᵢ)
//! ```
//!
//! `amp` is the pool's amplification parameter as configured (1..=5000).
//! Internally it is carried with [`AMP_PRECISION`], so `A·nⁿ` above is
//! `amp · AMP_PRECISION · n / AMP_PRECISION`.
//!
//! Both the invariant and the single-balance solve use Newton iteration,
//! bounded by [`STABLE_MAX_ITERATIONS`] and stopping once two successive
//! estimates are within [`STABLE_CONVERGENCE`] wei of each other.
//!
//! Balances are upscaled 18-decimal values; the invariant iteration itself
//! runs on raw 256-bit integers.

use primitive_types::U256;
use tracing::{trace, warn};

use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};

/// Maximum Newton iterations for the invariant and balance solves.
pub const STABLE_MAX_ITERATIONS: u32 = 255;

/// Convergence threshold, in wei.
pub const STABLE_CONVERGENCE: u64 = 1;

/// Fixed-point precision of the amplification parameter.
pub const AMP_PRECISION: u64 = 1_000;

fn mul(a: U256, b: U256, what: &'static str) -> Result<U256, AmmError> {
    a.checked_mul(b).ok_or(AmmError::Overflow(what))
}

fn add(a: U256, b: U256, what: &'static str) -> Result<U256, AmmError> {
    a.checked_add(b).ok_or(AmmError::Overflow(what))
}

fn div_down(a: U256, b: U256) -> Result<U256, AmmError> {
    if b.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    Ok(a / b)
}

fn div_up(a: U256, b: U256) -> Result<U256, AmmError> {
    if b.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    if a.is_zero() {
        return Ok(U256::zero());
    }
    Ok((a - U256::one()) / b + U256::one())
}

fn converged(a: U256, b: U256) -> bool {
    let diff = if a > b { a - b } else { b - a };
    diff <= U256::from(STABLE_CONVERGENCE)
}

/// `amp · AMP_PRECISION · n`
fn amp_times_total(amp: u64, n: usize) -> Result<U256, AmmError> {
    mul(
        U256::from(amp) * U256::from(AMP_PRECISION),
        U256::from(n),
        "amp·n overflow",
    )
}

fn sum(balances: &[FixedPoint]) -> Result<FixedPoint, AmmError> {
    balances
        .iter()
        .try_fold(FixedPoint::ZERO, |acc, b| acc.safe_add(b))
}

/// `Dⁿ⁺¹ / (nⁿ·∏xᵢ)`, accumulated one balance at a time.
fn d_p(balances: &[FixedPoint], invariant: U256) -> Result<U256, AmmError> {
    let n = U256::from(balances.len());
    let mut d_p = invariant;
    for balance in balances {
        let denominator = mul(balance.raw(), n, "D_P: n·x overflow")?;
        d_p = div_down(mul(d_p, invariant, "D_P: D_P·D overflow")?, denominator)?;
    }
    Ok(d_p)
}

/// Computes the invariant `D`.
///
/// # Errors
///
/// - [`AmmError::InvariantDidNotConverge`] after [`STABLE_MAX_ITERATIONS`].
/// - [`AmmError::DivisionByZero`] if a balance is zero while others are not.
/// - [`AmmError::Overflow`] on 256-bit overflow.
pub fn calculate_invariant(amp: u64, balances: &[FixedPoint]) -> Result<FixedPoint, AmmError> {
    let total = sum(balances)?.raw();
    if total.is_zero() {
        return Ok(FixedPoint::ZERO);
    }
    let n = U256::from(balances.len());
    let att = amp_times_total(amp, balances.len())?;
    let precision = U256::from(AMP_PRECISION);

    let mut invariant = total;
    for iteration in 0..STABLE_MAX_ITERATIONS {
        let d_p = d_p(balances, invariant)?;
        let previous = invariant;

        // ((A·n·S / P + D_P·n) · D) / ((A·n − P)·D / P + (n + 1)·D_P)
        let numerator = mul(
            add(
                mul(att, total, "D: A·n·S overflow")? / precision,
                mul(d_p, n, "D: D_P·n overflow")?,
                "D: numerator overflow",
            )?,
            invariant,
            "D: numerator overflow",
        )?;
        let denominator = add(
            mul(att - precision, invariant, "D: denominator overflow")? / precision,
            mul(n + U256::one(), d_p, "D: (n+1)·D_P overflow")?,
            "D: denominator overflow",
        )?;
        invariant = div_down(numerator, denominator)?;

        if converged(invariant, previous) {
            trace!(iterations = iteration + 1, "stable invariant converged");
            return Ok(FixedPoint::from_raw(invariant));
        }
    }
    warn!(amp, tokens = balances.len(), "stable invariant did not converge");
    Err(AmmError::InvariantDidNotConverge("stable invariant"))
}

/// Solves for the balance of token `index` that keeps `invariant`, given
/// every other balance. The current balance of `index` is ignored.
///
/// # Errors
///
/// - [`AmmError::InvariantDidNotConverge`] after [`STABLE_MAX_ITERATIONS`].
/// - [`AmmError::InvalidToken`] if `index` is out of range.
pub fn token_balance_given_invariant(
    amp: u64,
    balances: &[FixedPoint],
    invariant: FixedPoint,
    index: usize,
) -> Result<FixedPoint, AmmError> {
    let d = invariant.raw();
    let n = U256::from(balances.len());
    let att = amp_times_total(amp, balances.len())?;
    let precision = U256::from(AMP_PRECISION);
    let own = balances
        .get(index)
        .ok_or(AmmError::InvalidToken("token index out of range"))?
        .raw();
    let (first, rest) = balances
        .split_first()
        .ok_or(AmmError::InvalidConfiguration("pool has no tokens"))?;

    let mut total = first.raw();
    let mut p_d = mul(first.raw(), n, "y: P_D overflow")?;
    for balance in rest {
        p_d = div_down(
            mul(mul(p_d, balance.raw(), "y: P_D overflow")?, n, "y: P_D overflow")?,
            d,
        )?;
        total = add(total, balance.raw(), "y: sum overflow")?;
    }
    let others = total - own;

    let d2 = mul(d, d, "y: D² overflow")?;
    let c = mul(
        mul(
            div_up(d2, mul(att, p_d, "y: A·n·P_D overflow")?)?,
            precision,
            "y: c overflow",
        )?,
        own,
        "y: c overflow",
    )?;
    let b = add(
        others,
        mul(div_down(d, att)?, precision, "y: b overflow")?,
        "y: b overflow",
    )?;

    let mut y = div_up(add(d2, c, "y: overflow")?, add(d, b, "y: overflow")?)?;
    for iteration in 0..STABLE_MAX_ITERATIONS {
        let previous = y;
        // y = (y² + c) / (2y + b − D)
        let numerator = add(mul(y, y, "y: y² overflow")?, c, "y: overflow")?;
        let denominator = add(mul(y, U256::from(2u8), "y: 2y overflow")?, b, "y: overflow")?
            .checked_sub(d)
            .ok_or(AmmError::Underflow("y: 2y + b − D underflow"))?;
        y = div_up(numerator, denominator)?;

        if converged(y, previous) {
            trace!(iterations = iteration + 1, "stable balance converged");
            return Ok(FixedPoint::from_raw(y));
        }
    }
    warn!(amp, index, "stable balance did not converge");
    Err(AmmError::InvariantDidNotConverge("stable token balance"))
}

/// BPT minted for depositing `amounts_in`.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] on mismatched lengths.
/// - Any solver error from [`calculate_invariant`].
pub fn bpt_out_given_exact_tokens_in(
    amp: u64,
    balances: &[FixedPoint],
    amounts_in: &[FixedPoint],
    total_supply: FixedPoint,
    current_invariant: FixedPoint,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    if balances.len() != amounts_in.len() {
        return Err(AmmError::InvalidConfiguration(
            "balances and amounts must have equal length",
        ));
    }
    let total = sum(balances)?;

    let mut ratios = Vec::with_capacity(balances.len());
    let mut invariant_ratio_with_fees = FixedPoint::ZERO;
    for (balance, amount) in balances.iter().zip(amounts_in) {
        let current_weight = balance.div_down(total)?;
        let ratio = balance.safe_add(amount)?.div_down(*balance)?;
        invariant_ratio_with_fees = invariant_ratio_with_fees.safe_add(&ratio.mul_down(current_weight)?)?;
        ratios.push(ratio);
    }

    let mut new_balances = Vec::with_capacity(balances.len());
    for ((balance, amount), ratio) in balances.iter().zip(amounts_in).zip(&ratios) {
        let amount_without_fee = if *ratio > invariant_ratio_with_fees {
            let non_taxable = if invariant_ratio_with_fees > FixedPoint::ONE {
                balance.mul_down(invariant_ratio_with_fees.saturating_sub(FixedPoint::ONE))?
            } else {
                FixedPoint::ZERO
            };
            let taxable = amount.safe_sub(&non_taxable)?;
            non_taxable.safe_add(&taxable.mul_down(swap_fee.complement())?)?
        } else {
            *amount
        };
        new_balances.push(balance.safe_add(&amount_without_fee)?);
    }

    let new_invariant = calculate_invariant(amp, &new_balances)?;
    let invariant_ratio = new_invariant.div_down(current_invariant)?;
    if invariant_ratio > FixedPoint::ONE {
        total_supply.mul_down(invariant_ratio.saturating_sub(FixedPoint::ONE))
    } else {
        Ok(FixedPoint::ZERO)
    }
}

/// BPT burned for withdrawing `amounts_out`.
///
/// # Errors
///
/// - [`AmmError::ExceedsPoolBalance`] if an amount (fee included) exceeds
///   its balance.
/// - Any solver error from [`calculate_invariant`].
pub fn bpt_in_given_exact_tokens_out(
    amp: u64,
    balances: &[FixedPoint],
    amounts_out: &[FixedPoint],
    total_supply: FixedPoint,
    current_invariant: FixedPoint,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    if balances.len() != amounts_out.len() {
        return Err(AmmError::InvalidConfiguration(
            "balances and amounts must have equal length",
        ));
    }
    let total = sum(balances)?;

    let mut ratios = Vec::with_capacity(balances.len());
    let mut invariant_ratio_without_fees = FixedPoint::ZERO;
    for (balance, amount) in balances.iter().zip(amounts_out) {
        let current_weight = balance.div_down(total)?;
        let remaining = balance
            .safe_sub(amount)
            .map_err(|_| AmmError::ExceedsPoolBalance)?;
        let ratio = remaining.div_up(*balance)?;
        invariant_ratio_without_fees = invariant_ratio_without_fees.safe_add(&ratio.mul_up(current_weight)?)?;
        ratios.push(ratio);
    }

    let mut new_balances = Vec::with_capacity(balances.len());
    for ((balance, amount), ratio) in balances.iter().zip(amounts_out).zip(&ratios) {
        let amount_with_fee = if invariant_ratio_without_fees > *ratio {
            let non_taxable = balance.mul_down(invariant_ratio_without_fees.complement())?;
            let taxable = amount.saturating_sub(non_taxable);
            non_taxable.safe_add(&taxable.div_up(swap_fee.complement())?)?
        } else {
            *amount
        };
        new_balances.push(
            balance
                .safe_sub(&amount_with_fee)
                .map_err(|_| AmmError::ExceedsPoolBalance)?,
        );
    }

    let new_invariant = calculate_invariant(amp, &new_balances)?;
    let invariant_ratio = new_invariant.div_down(current_invariant)?;
    total_supply.mul_up(invariant_ratio.complement())
}

/// Amount of token `index` paid out for burning `bpt_in`.
///
/// # Errors
///
/// - [`AmmError::ExceedsPoolBalance`] if `bpt_in` exceeds the supply.
/// - Any solver error from [`token_balance_given_invariant`].
pub fn token_out_given_exact_bpt_in(
    amp: u64,
    balances: &[FixedPoint],
    index: usize,
    bpt_in: FixedPoint,
    total_supply: FixedPoint,
    current_invariant: FixedPoint,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let remaining_supply = total_supply
        .safe_sub(&bpt_in)
        .map_err(|_| AmmError::ExceedsPoolBalance)?;
    let new_invariant = remaining_supply.div_up(total_supply)?.mul_up(current_invariant)?;
    let new_balance = token_balance_given_invariant(amp, balances, new_invariant, index)?;
    let balance = balances
        .get(index)
        .copied()
        .ok_or(AmmError::InvalidToken("token index out of range"))?;
    let amount_without_fee = balance.saturating_sub(new_balance);

    let current_weight = balance.div_down(sum(balances)?)?;
    let taxable = amount_without_fee.mul_up(current_weight.complement())?;
    let non_taxable = amount_without_fee.safe_sub(&taxable)?;
    non_taxable.safe_add(&taxable.mul_down(swap_fee.complement())?)
}

/// Partial derivative of the invariant with respect to each balance,
/// `∂D/∂xᵢ`, at the given invariant.
fn invariant_gradient(
    amp: u64,
    balances: &[FixedPoint],
    invariant: FixedPoint,
) -> Result<Vec<FixedPoint>, AmmError> {
    let n = balances.len() as u128;
    let a = FixedPoint::from_integer(u128::from(amp) * n);
    let d_p = FixedPoint::from_raw(d_p(balances, invariant.raw())?);

    // ∂F/∂D, sign flipped: A·n − 1 + (n + 1)·D_P / D
    let denominator = a
        .saturating_sub(FixedPoint::ONE)
        .safe_add(&d_p.div_down(invariant)?.mul_down(FixedPoint::from_integer(n + 1))?)?;
    balances
        .iter()
        .map(|balance| {
            // ∂F/∂xᵢ: A·n + D_P / xᵢ
            a.safe_add(&d_p.div_down(*balance)?)?.div_down(denominator)
        })
        .collect()
}

/// Marginal price in upscaled units: units of `index_in` per unit of
/// `index_out`, swap fee included.
///
/// # Errors
///
/// - [`AmmError::InvalidToken`] for out-of-range indices.
/// - Any solver error from [`calculate_invariant`].
pub fn spot_price(
    amp: u64,
    balances: &[FixedPoint],
    index_in: usize,
    index_out: usize,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let invariant = calculate_invariant(amp, balances)?;
    let gradient = invariant_gradient(amp, balances, invariant)?;
    let (Some(g_in), Some(g_out)) = (gradient.get(index_in), gradient.get(index_out)) else {
        return Err(AmmError::InvalidToken("token index out of range"));
    };
    g_out.div_up(*g_in)?.div_up(swap_fee.complement())
}

/// BPT worth `amounts` at current prices: `Σ aᵢ · supply · (∂D/∂xᵢ) / D`.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] on mismatched lengths.
/// - Any solver error from [`calculate_invariant`].
pub fn bpt_zero_price_impact(
    amp: u64,
    balances: &[FixedPoint],
    amounts: &[FixedPoint],
    total_supply: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    if balances.len() != amounts.len() {
        return Err(AmmError::InvalidConfiguration(
            "balances and amounts must have equal length",
        ));
    }
    let invariant = calculate_invariant(amp, balances)?;
    let gradient = invariant_gradient(amp, balances, invariant)?;
    let mut total = FixedPoint::ZERO;
    for (amount, derivative) in amounts.iter().zip(&gradient) {
        let price = total_supply.mul_down(*derivative)?.div_down(invariant)?;
        total = total.safe_add(&amount.mul_down(price)?)?;
    }
    Ok(total)
}
