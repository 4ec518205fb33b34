//! Weighted pool concerns (Balancer `Weighted`, `Investment` and
//! `LiquidityBootstrapping` pools).
//!
//! Supports every join and exit kind: exact tokens in, proportional,
//! exact tokens out and single token. The math lives in
//! [`weighted_math`](super::weighted_math).

use super::common::{self, BptMath, ScaledPool};
use super::weighted_math;
use crate::config::NetworkConfig;
use crate::domain::{Address, Amount, ExitRequest, ExitResult, JoinRequest, JoinResult, PoolSnapshot};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};
use crate::traits::{
    ExitConcern, JoinConcern, LiquidityConcern, PriceImpactConcern, SpotPriceConcern,
};

/// Concerns of weighted pools.
///
/// Holds the network configuration so that joins may supply the native
/// asset in place of the wrapped native token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedConcerns {
    network: NetworkConfig,
}

impl WeightedConcerns {
    /// Creates weighted concerns for `network`.
    #[must_use]
    pub const fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    /// Returns the network configuration.
    #[must_use]
    pub const fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

impl BptMath for WeightedConcerns {
    fn bpt_out_given_exact_tokens_in(
        &self,
        pool: &ScaledPool<'_>,
        amounts_in: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        weighted_math::bpt_out_given_exact_tokens_in(
            pool.balances(),
            &pool.weights()?,
            amounts_in,
            pool.supply(),
            pool.fee(),
        )
    }

    fn bpt_zero_price_impact(
        &self,
        pool: &ScaledPool<'_>,
        amounts: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        weighted_math::bpt_zero_price_impact(pool.balances(), &pool.weights()?, amounts, pool.supply())
    }

    fn bpt_in_given_exact_tokens_out(
        &self,
        pool: &ScaledPool<'_>,
        amounts_out: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        weighted_math::bpt_in_given_exact_tokens_out(
            pool.balances(),
            &pool.weights()?,
            amounts_out,
            pool.supply(),
            pool.fee(),
        )
    }

    fn token_out_given_exact_bpt_in(
        &self,
        pool: &ScaledPool<'_>,
        index: usize,
        bpt_in: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        let weight = pool
            .token(index)?
            .weight()
            .ok_or(AmmError::InvalidWeight("weighted pool token without weight"))?;
        weighted_math::token_out_given_exact_bpt_in(
            pool.balance(index)?,
            weight,
            bpt_in,
            pool.supply(),
            pool.fee(),
        )
    }
}

impl JoinConcern for WeightedConcerns {
    fn join(&self, snapshot: &PoolSnapshot, request: &JoinRequest) -> Result<JoinResult, AmmError> {
        common::join_with(self, snapshot, request, Some(&self.network))
    }
}

impl ExitConcern for WeightedConcerns {
    fn exit(&self, snapshot: &PoolSnapshot, request: &ExitRequest) -> Result<ExitResult, AmmError> {
        common::exit_with(self, snapshot, request, Some(&self.network))
    }
}

impl SpotPriceConcern for WeightedConcerns {
    fn spot_price(
        &self,
        snapshot: &PoolSnapshot,
        token_in: Address,
        token_out: Address,
    ) -> Result<FixedPoint, AmmError> {
        let pool = ScaledPool::new(snapshot)?;
        let (i, o) = pool.pair(token_in, token_out)?;
        let weights = pool.weights()?;
        let (Some(w_in), Some(w_out)) = (weights.get(i), weights.get(o)) else {
            return Err(AmmError::InvalidWeight("weighted pool token without weight"));
        };
        let scaled = weighted_math::spot_price(
            pool.balance(i)?,
            *w_in,
            pool.balance(o)?,
            *w_out,
            pool.fee(),
        )?;
        pool.unscale_price(i, o, scaled)
    }
}

impl PriceImpactConcern for WeightedConcerns {
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

impl LiquidityConcern for WeightedConcerns {
    /// Values the tokens with a known price and extrapolates the rest
    /// through the weights: `known_value / known_weight`.
    fn liquidity(
        &self,
        snapshot: &PoolSnapshot,
        token_prices: &[Option<FixedPoint>],
    ) -> Result<FixedPoint, AmmError> {
        let pool = ScaledPool::new(snapshot)?;
        if token_prices.len() != pool.len() {
            return Err(AmmError::InvalidConfiguration(
                "token prices must match the pool's token count",
            ));
        }
        let weights = pool.weights()?;
        let mut known_value = FixedPoint::ZERO;
        let mut known_weight = FixedPoint::ZERO;
        for (i, (price, weight)) in token_prices.iter().zip(&weights).enumerate() {
            if let Some(price) = price {
                let value = common::whole_balance(pool.token(i)?)?.mul_down(*price)?;
                known_value = known_value.safe_add(&value)?;
                known_weight = known_weight.safe_add(weight)?;
            }
        }
        if known_weight.is_zero() {
            return Err(AmmError::InvalidToken("no token price is known"));
        }
        known_value.div_down(known_weight)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Decimals, ExitKind, JoinKind, PoolToken, SlippageTolerance};
    use crate::pools::common::tests::{addr, e18, fp, mainnet, pool_id, token};

    fn concerns() -> WeightedConcerns {
        WeightedConcerns::new(mainnet())
    }

    fn fifty_fifty() -> PoolSnapshot {
        PoolSnapshot::new(
            pool_id(0x50),
            "Weighted",
            vec![
                token(1, e18(1000)).with_weight(fp("0.5")),
                token(2, e18(1000)).with_weight(fp("0.5")),
            ],
            FixedPoint::ZERO,
            e18(2000),
        )
    }

    fn join(snapshot: &PoolSnapshot, kind: JoinKind, bps: u32) -> JoinResult {
        let Ok(slippage) = SlippageTolerance::new(bps) else {
            panic!("tolerance");
        };
        let request = JoinRequest::new(addr(0xa0), addr(0xa0), vec![addr(1), addr(2)], kind, slippage);
        let Ok(result) = concerns().join(snapshot, &request) else {
            panic!("join failed");
        };
        result
    }

    #[test]
    fn fifty_fifty_join_mints_ten_percent_of_supply() {
        let Ok(kind) = JoinKind::exact_tokens_in(vec![e18(100), e18(100)]) else {
            panic!("kind");
        };
        let result = join(&fifty_fifty(), kind, 0);
        let minted = result.expected_bpt_out().get();
        let target = e18(200).get();
        assert!(minted <= target);
        assert!(target - minted < 100_000_000_000, "minted {minted}");
        assert!(result.price_impact() < fp("0.000000001"));
        assert_eq!(result.min_bpt_out(), result.expected_bpt_out());
    }

    #[test]
    fn min_bpt_out_applies_slippage() {
        let Ok(kind) = JoinKind::exact_tokens_in(vec![e18(100), e18(100)]) else {
            panic!("kind");
        };
        let result = join(&fifty_fifty(), kind, 100);
        let Ok(one_percent) = SlippageTolerance::new(100) else {
            panic!("tolerance");
        };
        assert_eq!(one_percent.shrink(result.expected_bpt_out()), Ok(result.min_bpt_out()));
        assert!(result.min_bpt_out() < result.expected_bpt_out());
    }

    #[test]
    fn single_sided_join_has_price_impact() {
        let Ok(kind) = JoinKind::exact_tokens_in(vec![e18(500), Amount::ZERO]) else {
            panic!("kind");
        };
        let result = join(&fifty_fifty(), kind, 0);
        assert!(result.price_impact() > fp("0.05"));
        assert!(result.price_impact() < FixedPoint::ONE);
    }

    #[test]
    fn proportional_join_bounds_amounts_in() {
        let Ok(kind) = JoinKind::proportional(e18(20)) else {
            panic!("kind");
        };
        let result = join(&fifty_fifty(), kind, 50);
        assert_eq!(result.expected_amounts_in(), &[e18(10), e18(10)]);
        assert_eq!(result.max_amounts_in(), vec![Amount::new(10_050_000_000_000_000_000); 2]);
        assert_eq!(result.price_impact(), FixedPoint::ZERO);
    }

    #[test]
    fn single_token_exit_pays_one_token() {
        let Ok(kind) = ExitKind::single_token(e18(20), addr(2)) else {
            panic!("kind");
        };
        let request = ExitRequest::new(addr(0xa0), addr(0xa0), kind, SlippageTolerance::ZERO);
        let Ok(result) = concerns().exit(&fifty_fifty(), &request) else {
            panic!("exit");
        };
        let amounts = result.expected_amounts_out();
        assert_eq!(amounts.first(), Some(&Amount::ZERO));
        // 1000 · (1 − 0.99²) = 19.9
        assert_eq!(amounts.get(1), Some(&Amount::new(19_900_000_000_000_000_000)));
    }

    #[test]
    fn exact_tokens_out_burns_at_least_proportional_share() {
        let Ok(kind) = ExitKind::exact_tokens_out(vec![e18(10), e18(10)]) else {
            panic!("kind");
        };
        let request = ExitRequest::new(addr(0xa0), addr(0xa0), kind, SlippageTolerance::ZERO);
        let Ok(result) = concerns().exit(&fifty_fifty(), &request) else {
            panic!("exit");
        };
        assert!(result.expected_bpt_in() >= e18(20));
        assert!(result.expected_bpt_in().get() - e18(20).get() < 1_000_000_000);
    }

    #[test]
    fn spot_price_across_decimals() {
        let Ok(six) = Decimals::new(6) else {
            panic!("decimals");
        };
        let snapshot = PoolSnapshot::new(
            pool_id(0x80),
            "Weighted",
            vec![
                PoolToken::new(addr(1), Amount::new(2_000_000_000), six).with_weight(fp("0.2")),
                token(2, e18(4)).with_weight(fp("0.8")),
            ],
            FixedPoint::ZERO,
            e18(100),
        );
        // 2000 USDC at 20% against 4 ETH at 80%: 2000 USDC per ETH
        let Ok(price) = concerns().spot_price(&snapshot, addr(1), addr(2)) else {
            panic!("price");
        };
        assert_eq!(price, FixedPoint::from_integer(2000));
    }

    #[test]
    fn spot_price_unknown_token() {
        assert!(matches!(
            concerns().spot_price(&fifty_fifty(), addr(1), addr(9)),
            Err(AmmError::InvalidToken(_))
        ));
    }

    #[test]
    fn liquidity_extrapolates_by_weight() {
        let snapshot = PoolSnapshot::new(
            pool_id(0x80),
            "Weighted",
            vec![
                token(1, e18(100)).with_weight(fp("0.8")),
                token(2, e18(50)).with_weight(fp("0.2")),
            ],
            FixedPoint::ZERO,
            e18(100),
        );
        let Ok(total) = concerns().liquidity(&snapshot, &[Some(fp("4")), None]) else {
            panic!("liquidity");
        };
        assert_eq!(total, FixedPoint::from_integer(500));
    }

    #[test]
    fn paused_pool_rejects_exit() {
        let Ok(kind) = ExitKind::proportional(e18(1)) else {
            panic!("kind");
        };
        let request = ExitRequest::new(addr(0xa0), addr(0xa0), kind, SlippageTolerance::ZERO);
        assert_eq!(
            concerns().exit(&fifty_fifty().with_paused(true), &request),
            Err(AmmError::PoolPaused)
        );
    }
}
