//! Weighted-product invariant math.
//!
//! ```text
//! ∏ Bᵢ^wᵢ = V
//! ```
//!
//! All values are upscaled 18-decimal numbers. Joins and exits that change
//! the pool's composition pay the swap fee on the part that moves the pool
//! away from its current proportions (the "taxable" amount); the
//! proportional part is free.

use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};

fn ensure_lengths(balances: &[FixedPoint], weights: &[FixedPoint], amounts: &[FixedPoint]) -> Result<(), AmmError> {
    if balances.len() != weights.len() || balances.len() != amounts.len() {
        return Err(AmmError::InvalidConfiguration(
            "balances, weights and amounts must have equal length",
        ));
    }
    Ok(())
}

/// BPT minted for depositing `amounts_in`.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] on mismatched lengths.
/// - [`AmmError::DivisionByZero`] if a balance is zero.
pub fn bpt_out_given_exact_tokens_in(
    balances: &[FixedPoint],
    weights: &[FixedPoint],
    amounts_in: &[FixedPoint],
    total_supply: FixedPoint,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    ensure_lengths(balances, weights, amounts_in)?;

    let mut ratios = Vec::with_capacity(balances.len());
    let mut invariant_ratio_with_fees = FixedPoint::ZERO;
    for ((balance, weight), amount) in balances.iter().zip(weights).zip(amounts_in) {
        let ratio = balance.safe_add(amount)?.div_down(*balance)?;
        invariant_ratio_with_fees = invariant_ratio_with_fees.safe_add(&ratio.mul_down(*weight)?)?;
        ratios.push(ratio);
    }

    let mut invariant_ratio = FixedPoint::ONE;
    for (((balance, weight), amount), ratio) in balances.iter().zip(weights).zip(amounts_in).zip(&ratios) {
        let amount_without_fee = if *ratio > invariant_ratio_with_fees {
            let non_taxable = balance.mul_down(invariant_ratio_with_fees.saturating_sub(FixedPoint::ONE))?;
            let taxable = amount.safe_sub(&non_taxable)?;
            let fee = taxable.mul_up(swap_fee)?;
            non_taxable.safe_add(&taxable.safe_sub(&fee)?)?
        } else {
            *amount
        };
        let balance_ratio = balance.safe_add(&amount_without_fee)?.div_down(*balance)?;
        invariant_ratio = invariant_ratio.mul_down(balance_ratio.pow_down(*weight)?)?;
    }

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
/// - [`AmmError::InvalidConfiguration`] on mismatched lengths.
/// - [`AmmError::ExceedsPoolBalance`] if an amount (fee included) exceeds
///   its balance.
pub fn bpt_in_given_exact_tokens_out(
    balances: &[FixedPoint],
    weights: &[FixedPoint],
    amounts_out: &[FixedPoint],
    total_supply: FixedPoint,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    ensure_lengths(balances, weights, amounts_out)?;

    let mut ratios = Vec::with_capacity(balances.len());
    let mut invariant_ratio_without_fees = FixedPoint::ZERO;
    for ((balance, weight), amount) in balances.iter().zip(weights).zip(amounts_out) {
        let remaining = balance
            .safe_sub(amount)
            .map_err(|_| AmmError::ExceedsPoolBalance)?;
        let ratio = remaining.div_up(*balance)?;
        invariant_ratio_without_fees = invariant_ratio_without_fees.safe_add(&ratio.mul_up(*weight)?)?;
        ratios.push(ratio);
    }

    let mut invariant_ratio = FixedPoint::ONE;
    for (((balance, weight), amount), ratio) in balances.iter().zip(weights).zip(amounts_out).zip(&ratios) {
        let amount_with_fee = if invariant_ratio_without_fees > *ratio {
            let non_taxable = balance.mul_down(invariant_ratio_without_fees.complement())?;
            let taxable = amount.saturating_sub(non_taxable);
            non_taxable.safe_add(&taxable.div_up(swap_fee.complement())?)?
        } else {
            *amount
        };
        let remaining = balance
            .safe_sub(&amount_with_fee)
            .map_err(|_| AmmError::ExceedsPoolBalance)?;
        let balance_ratio = remaining.div_down(*balance)?;
        invariant_ratio = invariant_ratio.mul_down(balance_ratio.pow_down(*weight)?)?;
    }

    total_supply.mul_up(invariant_ratio.complement())
}

/// Amount of one token paid out for burning `bpt_in`.
///
/// # Errors
///
/// - [`AmmError::ExceedsPoolBalance`] if `bpt_in` exceeds the supply.
/// - [`AmmError::DivisionByZero`] for a zero weight or supply.
pub fn token_out_given_exact_bpt_in(
    balance: FixedPoint,
    weight: FixedPoint,
    bpt_in: FixedPoint,
    total_supply: FixedPoint,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let remaining_supply = total_supply
        .safe_sub(&bpt_in)
        .map_err(|_| AmmError::ExceedsPoolBalance)?;
    let invariant_ratio = remaining_supply.div_up(total_supply)?;
    let balance_ratio = invariant_ratio.pow_up(FixedPoint::ONE.div_down(weight)?)?;
    let amount_without_fee = balance.mul_down(balance_ratio.complement())?;

    // The share of the withdrawal above the token's own weight is a swap.
    let taxable = amount_without_fee.mul_up(weight.complement())?;
    let non_taxable = amount_without_fee.safe_sub(&taxable)?;
    non_taxable.safe_add(&taxable.mul_down(swap_fee.complement())?)
}

/// Marginal price in upscaled units: `(B_in/w_in) / (B_out/w_out) / (1 − fee)`.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] for zero weights, zero balances or
/// a fee of one.
pub fn spot_price(
    balance_in: FixedPoint,
    weight_in: FixedPoint,
    balance_out: FixedPoint,
    weight_out: FixedPoint,
    swap_fee: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    let numerator = balance_in.div_up(weight_in)?;
    let denominator = balance_out.div_down(weight_out)?;
    numerator.div_up(denominator)?.div_up(swap_fee.complement())
}

/// BPT worth `amounts` at current prices: `Σ aᵢ · supply · wᵢ / Bᵢ`.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] on mismatched lengths.
/// - [`AmmError::DivisionByZero`] if a balance is zero.
pub fn bpt_zero_price_impact(
    balances: &[FixedPoint],
    weights: &[FixedPoint],
    amounts: &[FixedPoint],
    total_supply: FixedPoint,
) -> Result<FixedPoint, AmmError> {
    ensure_lengths(balances, weights, amounts)?;
    let mut total = FixedPoint::ZERO;
    for ((balance, weight), amount) in balances.iter().zip(weights).zip(amounts) {
        let price = total_supply.mul_down(*weight)?.div_down(*balance)?;
        total = total.safe_add(&amount.mul_down(price)?)?;
    }
    Ok(total)
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

    fn within(actual: FixedPoint, expected: FixedPoint, tolerance: &str) -> bool {
        let diff = if actual > expected {
            actual.saturating_sub(expected)
        } else {
            expected.saturating_sub(actual)
        };
        diff <= fp(tolerance)
    }

    #[test]
    fn fifty_fifty_proportional_join_mints_ten_percent() {
        let balances = [fp("1000"), fp("1000")];
        let weights = [fp("0.5"), fp("0.5")];
        let amounts = [fp("100"), fp("100")];
        let Ok(bpt) = bpt_out_given_exact_tokens_in(&balances, &weights, &amounts, fp("2000"), FixedPoint::ZERO) else {
            panic!("join");
        };
        assert!(bpt <= fp("200"));
        assert!(within(bpt, fp("200"), "0.0000001"), "got {bpt}");
    }

    #[test]
    fn single_sided_join_pays_fee() {
        let balances = [fp("1000"), fp("1000")];
        let weights = [fp("0.5"), fp("0.5")];
        let amounts = [fp("100"), FixedPoint::ZERO];
        let Ok(free) = bpt_out_given_exact_tokens_in(&balances, &weights, &amounts, fp("2000"), FixedPoint::ZERO) else {
            panic!("join");
        };
        let Ok(taxed) = bpt_out_given_exact_tokens_in(&balances, &weights, &amounts, fp("2000"), fp("0.01")) else {
            panic!("join");
        };
        assert!(taxed < free);
        // 2000 · (sqrt(1.1) − 1) ≈ 97.6176
        assert!(within(free, fp("97.617696340303"), "0.000001"), "got {free}");
    }

    #[test]
    fn exact_out_round_trips_with_exact_in() {
        let balances = [fp("800"), fp("200")];
        let weights = [fp("0.8"), fp("0.2")];
        let amounts = [fp("8"), fp("2")];
        let Ok(bpt_in) = bpt_in_given_exact_tokens_out(&balances, &weights, &amounts, fp("1000"), fp("0.003")) else {
            panic!("exit");
        };
        // proportional withdrawal of 1%: no fee, bpt_in rounds up
        assert!(bpt_in >= fp("10"));
        assert!(within(bpt_in, fp("10"), "0.000001"), "got {bpt_in}");
    }

    #[test]
    fn exit_beyond_balance_fails() {
        let balances = [fp("10"), fp("10")];
        let weights = [fp("0.5"), fp("0.5")];
        let amounts = [fp("11"), FixedPoint::ZERO];
        assert_eq!(
            bpt_in_given_exact_tokens_out(&balances, &weights, &amounts, fp("20"), FixedPoint::ZERO),
            Err(AmmError::ExceedsPoolBalance)
        );
    }

    #[test]
    fn single_token_exit_half_weight() {
        // burning 19% of supply from a 50% token: 1000 · (1 − 0.81²) ≈ 343.9
        let Ok(out) = token_out_given_exact_bpt_in(fp("1000"), fp("0.5"), fp("190"), fp("1000"), FixedPoint::ZERO) else {
            panic!("exit");
        };
        assert!(within(out, fp("343.9"), "0.00001"), "got {out}");
    }

    #[test]
    fn spot_price_includes_fee() {
        let Ok(p) = spot_price(fp("200"), fp("0.2"), fp("800"), fp("0.8"), FixedPoint::ZERO) else {
            panic!("price");
        };
        assert_eq!(p, FixedPoint::ONE);
        let Ok(with_fee) = spot_price(fp("200"), fp("0.2"), fp("800"), fp("0.8"), fp("0.01")) else {
            panic!("price");
        };
        assert!(within(with_fee, fp("1.010101010101010102"), "0.000000000000000002"));
    }

    #[test]
    fn zero_impact_bpt_is_linear_in_amounts() {
        let balances = [fp("1000"), fp("1000")];
        let weights = [fp("0.5"), fp("0.5")];
        let Ok(bpt) = bpt_zero_price_impact(&balances, &weights, &[fp("100"), fp("100")], fp("2000")) else {
            panic!("zero impact");
        };
        assert_eq!(bpt, fp("200"));
    }
}
