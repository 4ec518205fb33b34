//! Gyroscope pool concerns (`Gyro2`, `Gyro3`, `GyroE`).
//!
//! Joins and exits are proportional only. Spot prices and price impact use
//! the marginal values of [`gyro_math`](super::gyro_math); the elliptic
//! E-CLP has neither.

use super::common::{self, BptMath, ScaledPool};
use super::gyro_math;
use crate::domain::{
    Address, Amount, ExitRequest, ExitResult, GyroParams, JoinRequest, JoinResult, PoolSnapshot,
};
use crate::error::AmmError;
use crate::math::FixedPoint;
use crate::traits::{
    ExitConcern, JoinConcern, LiquidityConcern, PriceImpactConcern, SpotPriceConcern,
};

/// Concerns of Gyroscope pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GyroConcerns;

impl GyroConcerns {
    /// Creates Gyroscope concerns.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Marginal value of each token, in non-BPT order.
    fn values(pool: &ScaledPool<'_>) -> Result<Vec<FixedPoint>, AmmError> {
        let params = pool
            .snapshot()
            .gyro()
            .ok_or(AmmError::InvalidConfiguration("gyro parameters missing"))?;
        match *params {
            GyroParams::TwoClp {
                sqrt_alpha,
                sqrt_beta,
            } => {
                let [x, y] = pool.balances() else {
                    return Err(AmmError::InvalidConfiguration("2-CLP pools hold two tokens"));
                };
                Ok(gyro_math::two_clp_values(*x, *y, sqrt_alpha, sqrt_beta)?.to_vec())
            }
            GyroParams::ThreeClp { root3_alpha } => {
                gyro_math::three_clp_values(pool.balances(), root3_alpha)
            }
            GyroParams::EClp { .. } => Err(AmmError::UnsupportedOperation(
                "E-CLP pools have no spot price or price impact",
            )),
        }
    }
}

impl BptMath for GyroConcerns {
    fn bpt_out_given_exact_tokens_in(
        &self,
        pool: &ScaledPool<'_>,
        amounts_in: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        common::bpt_out_at_min_ratio(pool, amounts_in)
    }

    fn bpt_zero_price_impact(
        &self,
        pool: &ScaledPool<'_>,
        amounts: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        let values = Self::values(pool)?;
        gyro_math::bpt_zero_price_impact(pool.balances(), &values, amounts, pool.supply())
    }

    fn proportional_only(&self) -> bool {
        true
    }
}

impl JoinConcern for GyroConcerns {
    fn join(&self, snapshot: &PoolSnapshot, request: &JoinRequest) -> Result<JoinResult, AmmError> {
        common::join_with(self, snapshot, request, None)
    }
}

impl ExitConcern for GyroConcerns {
    fn exit(&self, snapshot: &PoolSnapshot, request: &ExitRequest) -> Result<ExitResult, AmmError> {
        common::exit_with(self, snapshot, request, None)
    }
}

impl SpotPriceConcern for GyroConcerns {
    fn spot_price(
        &self,
        snapshot: &PoolSnapshot,
        token_in: Address,
        token_out: Address,
    ) -> Result<FixedPoint, AmmError> {
        let pool = ScaledPool::new(snapshot)?;
        let (i, o) = pool.pair(token_in, token_out)?;
        let values = Self::values(&pool)?;
        let scaled = gyro_math::spot_price(&values, i, o, pool.fee())?;
        pool.unscale_price(i, o, scaled)
    }
}

impl PriceImpactConcern for GyroConcerns {
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

impl LiquidityConcern for GyroConcerns {
    fn liquidity(
        &self,
        snapshot: &PoolSnapshot,
        token_prices: &[Option<FixedPoint>],
    ) -> Result<FixedPoint, AmmError> {
        common::liquidity_with_mean_price(snapshot, token_prices)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ExitKind, JoinKind, SlippageTolerance};
    use crate::pools::common::tests::{addr, e18, fp, pool_id, token};

    fn two_clp() -> PoolSnapshot {
        PoolSnapshot::new(
            pool_id(0x92),
            "Gyro2",
            vec![token(1, e18(1000)), token(2, e18(1000))],
            FixedPoint::ZERO,
            e18(2000),
        )
        .with_gyro(GyroParams::TwoClp {
            sqrt_alpha: fp("0.9"),
            sqrt_beta: fp("1.111111111111111111"),
        })
    }

    fn e_clp() -> PoolSnapshot {
        PoolSnapshot::new(
            pool_id(0x9e),
            "GyroE",
            vec![token(1, e18(1000)), token(2, e18(1000))],
            FixedPoint::ZERO,
            e18(2000),
        )
        .with_gyro(GyroParams::EClp {
            alpha: fp("0.98"),
            beta: fp("1.02"),
            c: fp("0.707106781186547524"),
            s: fp("0.707106781186547524"),
            lambda: fp("2000"),
        })
    }

    #[test]
    fn two_clp_balanced_spot_price_is_one() {
        let Ok(p) = GyroConcerns::new().spot_price(&two_clp(), addr(1), addr(2)) else {
            panic!("price");
        };
        let diff = if p > FixedPoint::ONE {
            p.saturating_sub(FixedPoint::ONE)
        } else {
            FixedPoint::ONE.saturating_sub(p)
        };
        assert!(diff < fp("0.000000001"), "got {p}");
    }

    #[test]
    fn exact_in_join_mints_at_min_ratio() {
        let Ok(kind) = JoinKind::exact_tokens_in(vec![e18(10), e18(30)]) else {
            panic!("kind");
        };
        let request = JoinRequest::new(
            addr(0xa0),
            addr(0xa0),
            vec![addr(1), addr(2)],
            kind,
            SlippageTolerance::ZERO,
        );
        let Ok(result) = GyroConcerns::new().join(&two_clp(), &request) else {
            panic!("join");
        };
        assert_eq!(result.expected_bpt_out(), e18(20));
        assert_eq!(result.expected_amounts_in(), &[e18(10), e18(10)]);
        assert_eq!(result.price_impact(), FixedPoint::ZERO);
    }

    #[test]
    fn exact_out_exit_unsupported() {
        let Ok(kind) = ExitKind::exact_tokens_out(vec![e18(1), e18(1)]) else {
            panic!("kind");
        };
        let request = ExitRequest::new(addr(0xa0), addr(0xa0), kind, SlippageTolerance::ZERO);
        assert!(matches!(
            GyroConcerns::new().exit(&two_clp(), &request),
            Err(AmmError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn e_clp_joins_but_has_no_spot_price() {
        let Ok(kind) = JoinKind::exact_tokens_in(vec![e18(10), e18(10)]) else {
            panic!("kind");
        };
        let request = JoinRequest::new(
            addr(0xa0),
            addr(0xa0),
            vec![addr(1), addr(2)],
            kind,
            SlippageTolerance::ZERO,
        );
        assert!(GyroConcerns::new().join(&e_clp(), &request).is_ok());
        assert!(matches!(
            GyroConcerns::new().spot_price(&e_clp(), addr(1), addr(2)),
            Err(AmmError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            GyroConcerns::new().price_impact(&e_clp(), &[e18(1), e18(1)], e18(2), true),
            Err(AmmError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn three_clp_proportional_exit() {
        let snapshot = PoolSnapshot::new(
            pool_id(0x93),
            "Gyro3",
            vec![token(1, e18(300)), token(2, e18(300)), token(3, e18(300))],
            FixedPoint::ZERO,
            e18(900),
        )
        .with_gyro(GyroParams::ThreeClp {
            root3_alpha: fp("0.995"),
        });
        let Ok(kind) = ExitKind::proportional(e18(9)) else {
            panic!("kind");
        };
        let request = ExitRequest::new(addr(0xa0), addr(0xa0), kind, SlippageTolerance::ZERO);
        let Ok(result) = GyroConcerns::new().exit(&snapshot, &request) else {
            panic!("exit");
        };
        assert_eq!(result.expected_amounts_out(), &[e18(3), e18(3), e18(3)]);
        let Ok(impact) = GyroConcerns::new().price_impact(&snapshot, &[e18(3), e18(3), e18(3)], e18(9), false)
        else {
            panic!("impact");
        };
        assert!(impact < fp("0.000000001"));
    }
}
