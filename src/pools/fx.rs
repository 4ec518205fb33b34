//! FX pool concerns.
//!
//! FX pools trade currencies valued through oracle rates, carried here as
//! each token's price rate. Balances are compared in numeraire value, so
//! after upscaling one unit of any token is worth one unit of value. Only
//! proportional joins and exits exist; an exact-tokens-in request mints
//! against its most binding ratio and settles as a proportional join.

use super::common::{self, BptMath, ScaledPool};
use crate::domain::{Address, Amount, ExitRequest, ExitResult, JoinRequest, JoinResult, PoolSnapshot};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};
use crate::traits::{
    ExitConcern, JoinConcern, LiquidityConcern, PriceImpactConcern, SpotPriceConcern,
};

/// Concerns of FX pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FxConcerns;

impl FxConcerns {
    /// Creates FX concerns.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn total(values: &[FixedPoint]) -> Result<FixedPoint, AmmError> {
    values
        .iter()
        .try_fold(FixedPoint::ZERO, |acc, v| acc.safe_add(v))
}

impl BptMath for FxConcerns {
    fn bpt_out_given_exact_tokens_in(
        &self,
        pool: &ScaledPool<'_>,
        amounts_in: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        common::bpt_out_at_min_ratio(pool, amounts_in)
    }

    /// `supply · Σ aᵢ / Σ Bᵢ`, all in numeraire value.
    fn bpt_zero_price_impact(
        &self,
        pool: &ScaledPool<'_>,
        amounts: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        pool.supply()
            .mul_down(total(amounts)?)?
            .div_down(total(pool.balances())?)
    }

    fn proportional_only(&self) -> bool {
        true
    }
}

impl JoinConcern for FxConcerns {
    fn join(&self, snapshot: &PoolSnapshot, request: &JoinRequest) -> Result<JoinResult, AmmError> {
        common::join_with(self, snapshot, request, None)
    }
}

impl ExitConcern for FxConcerns {
    fn exit(&self, snapshot: &PoolSnapshot, request: &ExitRequest) -> Result<ExitResult, AmmError> {
        common::exit_with(self, snapshot, request, None)
    }
}

impl SpotPriceConcern for FxConcerns {
    /// `rate_out / rate_in / (1 − fee)`.
    fn spot_price(
        &self,
        snapshot: &PoolSnapshot,
        token_in: Address,
        token_out: Address,
    ) -> Result<FixedPoint, AmmError> {
        let pool = ScaledPool::new(snapshot)?;
        let (i, o) = pool.pair(token_in, token_out)?;
        let scaled = FixedPoint::ONE.div_up(pool.fee().complement())?;
        pool.unscale_price(i, o, scaled)
    }
}

impl PriceImpactConcern for FxConcerns {
    fn price_impact(
        &self,
        snapshot: &PoolSnapshot,
        amounts: &[Amount],
        bpt_amount: Amount,
        is_join: bool,
    ) -> Result<FixedPoint, AmmError> {
        common::price_impact_with(self, snapshot, amounts, bpt_amount, is_join)
    }
}

impl LiquidityConcern for FxConcerns {
    fn liquidity(
        &self,
        snapshot: &PoolSnapshot,
        token_prices: &[Option<FixedPoint>],
    ) -> Result<FixedPoint, AmmError> {
        common::liquidity_with_mean_price(snapshot, token_prices)
    }
}
