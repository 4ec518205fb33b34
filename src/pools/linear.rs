//! Linear pool concerns (every `*Linear` tag).
//!
//! A linear pool holds a main token, its yield-bearing wrapped form and its
//! own BPT. The wrapped balance enters the math multiplied by its price
//! rate; the main balance through the fee band of
//! [`linear_math`](super::linear_math).

use super::common::{self, BptMath, ScaledPool};
use super::linear_math::{self, NominalCurve};
use crate::config::NetworkConfig;
use crate::domain::{Address, Amount, ExitRequest, ExitResult, JoinRequest, JoinResult, PoolSnapshot};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};
use crate::traits::{
    ExitConcern, JoinConcern, LiquidityConcern, PriceImpactConcern, SpotPriceConcern,
};

/// Main/wrapped positions among the non-BPT tokens plus the fee band.
struct Layout {
    main: usize,
    wrapped: usize,
    curve: NominalCurve,
}

impl Layout {
    fn of(pool: &ScaledPool<'_>) -> Result<Self, AmmError> {
        let params = pool
            .snapshot()
            .linear()
            .ok_or(AmmError::InvalidConfiguration("linear parameters missing"))?;
        if pool.len() != 2 {
            return Err(AmmError::InvalidConfiguration(
                "linear pools hold exactly one main and one wrapped token",
            ));
        }
        let main = pool
            .index_of_position(params.main_index())
            .ok_or(AmmError::InvalidConfiguration("linear main index is invalid"))?;
        let wrapped = pool
            .index_of_position(params.wrapped_index())
            .ok_or(AmmError::InvalidConfiguration("linear wrapped index is invalid"))?;
        if main == wrapped {
            return Err(AmmError::InvalidConfiguration(
                "linear main/wrapped indices are invalid",
            ));
        }
        let main_token = pool.token(main)?;
        let curve = NominalCurve::new(
            pool.fee(),
            main_token.upscale(params.lower_target())?,
            main_token.upscale(params.upper_target())?,
        )?;
        Ok(Self {
            main,
            wrapped,
            curve,
        })
    }

    fn split(&self, amounts: &[FixedPoint]) -> Result<(FixedPoint, FixedPoint), AmmError> {
        match (amounts.get(self.main), amounts.get(self.wrapped)) {
            (Some(main), Some(wrapped)) => Ok((*main, *wrapped)),
            _ => Err(AmmError::InvalidConfiguration(
                "amounts must match the pool's token count",
            )),
        }
    }

    fn balances(&self, pool: &ScaledPool<'_>) -> Result<(FixedPoint, FixedPoint), AmmError> {
        Ok((pool.balance(self.main)?, pool.balance(self.wrapped)?))
    }
}

/// One side of a linear spot price.
enum Side {
    Main,
    Wrapped,
    Bpt,
}

/// Concerns of linear pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearConcerns {
    network: NetworkConfig,
}

impl LinearConcerns {
    /// Creates linear concerns for `network`.
    #[must_use]
    pub const fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    /// Returns the network configuration.
    #[must_use]
    pub const fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Nominal value of one upscaled unit and the unit's rate.
    fn marginal(
        pool: &ScaledPool<'_>,
        layout: &Layout,
        side: &Side,
    ) -> Result<(FixedPoint, FixedPoint), AmmError> {
        let (main, wrapped) = layout.balances(pool)?;
        match side {
            Side::Main => Ok((
                layout.curve.marginal_main_value(main)?,
                pool.token(layout.main)?.price_rate(),
            )),
            Side::Wrapped => Ok((FixedPoint::ONE, pool.token(layout.wrapped)?.price_rate())),
            Side::Bpt => Ok((
                linear_math::bpt_value(&layout.curve, main, wrapped, pool.supply())?,
                FixedPoint::ONE,
            )),
        }
    }

    fn side(pool: &ScaledPool<'_>, layout: &Layout, token: Address) -> Result<Side, AmmError> {
        if token == pool.snapshot().address() {
            return Ok(Side::Bpt);
        }
        match pool.index_of(token) {
            Some(i) if i == layout.main => Ok(Side::Main),
            Some(i) if i == layout.wrapped => Ok(Side::Wrapped),
            _ => Err(AmmError::InvalidToken("token is not in the pool")),
        }
    }
}

impl BptMath for LinearConcerns {
    fn bpt_out_given_exact_tokens_in(
        &self,
        pool: &ScaledPool<'_>,
        amounts_in: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        let layout = Layout::of(pool)?;
        let (main, wrapped) = layout.balances(pool)?;
        let (main_in, wrapped_in) = layout.split(amounts_in)?;
        linear_math::bpt_out_given_exact_tokens_in(
            &layout.curve,
            main,
            wrapped,
            main_in,
            wrapped_in,
            pool.supply(),
        )
    }

    fn bpt_zero_price_impact(
        &self,
        pool: &ScaledPool<'_>,
        amounts: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        let layout = Layout::of(pool)?;
        let (main, wrapped) = layout.balances(pool)?;
        let (main_amount, wrapped_amount) = layout.split(amounts)?;
        let value = main_amount
            .mul_down(layout.curve.marginal_main_value(main)?)?
            .safe_add(&wrapped_amount)?;
        let invariant = layout.curve.invariant(main, wrapped)?;
        pool.supply().mul_down(value)?.div_down(invariant)
    }

    fn bpt_in_given_exact_tokens_out(
        &self,
        pool: &ScaledPool<'_>,
        amounts_out: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        let layout = Layout::of(pool)?;
        let (main, wrapped) = layout.balances(pool)?;
        let (main_out, wrapped_out) = layout.split(amounts_out)?;
        linear_math::bpt_in_given_exact_tokens_out(
            &layout.curve,
            main,
            wrapped,
            main_out,
            wrapped_out,
            pool.supply(),
        )
    }

    fn token_out_given_exact_bpt_in(
        &self,
        pool: &ScaledPool<'_>,
        index: usize,
        bpt_in: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        let layout = Layout::of(pool)?;
        let (main, wrapped) = layout.balances(pool)?;
        if index == layout.main {
            linear_math::main_out_given_exact_bpt_in(&layout.curve, main, wrapped, bpt_in, pool.supply())
        } else {
            linear_math::wrapped_out_given_exact_bpt_in(
                &layout.curve,
                main,
                wrapped,
                bpt_in,
                pool.supply(),
            )
        }
    }
}

impl JoinConcern for LinearConcerns {
    fn join(&self, snapshot: &PoolSnapshot, request: &JoinRequest) -> Result<JoinResult, AmmError> {
        common::join_with(self, snapshot, request, Some(&self.network))
    }
}

impl ExitConcern for LinearConcerns {
    fn exit(&self, snapshot: &PoolSnapshot, request: &ExitRequest) -> Result<ExitResult, AmmError> {
        common::exit_with(self, snapshot, request, Some(&self.network))
    }
}

impl SpotPriceConcern for LinearConcerns {
    /// Ratio of marginal nominal values, BPT included:
    /// `(v_out · rate_out) / (v_in · rate_in)`.
    fn spot_price(
        &self,
        snapshot: &PoolSnapshot,
        token_in: Address,
        token_out: Address,
    ) -> Result<FixedPoint, AmmError> {
        if token_in == token_out {
            return Err(AmmError::InvalidToken("token in and token out are the same"));
        }
        let pool = ScaledPool::new(snapshot)?;
        pool.require_supply()?;
        let layout = Layout::of(&pool)?;
        let (v_in, rate_in) = Self::marginal(&pool, &layout, &Self::side(&pool, &layout, token_in)?)?;
        let (v_out, rate_out) =
            Self::marginal(&pool, &layout, &Self::side(&pool, &layout, token_out)?)?;
        v_out.mul_up(rate_out)?.div_up(v_in.mul_down(rate_in)?)
    }
}

impl PriceImpactConcern for LinearConcerns {
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

impl LiquidityConcern for LinearConcerns {
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
    use crate::domain::{
        Decimals, ExitKind, JoinKind, LinearParams, PoolToken, SlippageTolerance,
    };
    use crate::pools::common::tests::{addr, e18, fp, mainnet, pool_id, token};

    fn concerns() -> LinearConcerns {
        LinearConcerns::new(mainnet())
    }

    /// DAI main, aDAI wrapped at `rate`, BPT in the middle.
    fn pool(main: u128, wrapped: u128, rate: &str) -> PoolSnapshot {
        let id = pool_id(0x11);
        PoolSnapshot::new(
            id,
            "AaveLinear",
            vec![
                token(1, e18(main)),
                PoolToken::new(id.address(), e18(5_000_000), Decimals::MAX),
                token(2, e18(wrapped)).with_price_rate(fp(rate)),
            ],
            fp("0.01"),
            e18(2000),
        )
        .with_linear(LinearParams::new(0, 2, e18(1000), e18(2000)))
    }

    fn join(snapshot: &PoolSnapshot, amounts: Vec<Amount>) -> JoinResult {
        let Ok(kind) = JoinKind::exact_tokens_in(amounts) else {
            panic!("kind");
        };
        let request = JoinRequest::new(
            addr(0xa0),
            addr(0xa0),
            vec![addr(1), addr(2)],
            kind,
            SlippageTolerance::ZERO,
        );
        let Ok(result) = concerns().join(snapshot, &request) else {
            panic!("join");
        };
        result
    }

    #[test]
    fn main_in_inside_band_mints_at_par() {
        let result = join(&pool(1500, 500, "1"), vec![e18(100), Amount::ZERO]);
        assert_eq!(result.expected_bpt_out(), e18(100));
        assert_eq!(result.price_impact(), FixedPoint::ZERO);
    }

    #[test]
    fn wrapped_in_is_valued_at_rate() {
        // invariant 1500 + 500·1.25 = 2125
        let result = join(&pool(1500, 500, "1.25"), vec![Amount::ZERO, e18(17)]);
        // 2000 · 21.25 / 2125
        assert_eq!(result.expected_bpt_out(), e18(20));
    }

    #[test]
    fn single_token_exit_main_and_wrapped() {
        for (token, position) in [(addr(1), 0usize), (addr(2), 1usize)] {
            let Ok(kind) = ExitKind::single_token(e18(100), token) else {
                panic!("kind");
            };
            let request = ExitRequest::new(addr(0xa0), addr(0xa0), kind, SlippageTolerance::ZERO);
            let Ok(result) = concerns().exit(&pool(1500, 500, "1"), &request) else {
                panic!("exit");
            };
            assert_eq!(result.expected_amounts_out().get(position), Some(&e18(100)));
            assert_eq!(result.price_impact(), FixedPoint::ZERO);
        }
    }

    #[test]
    fn spot_price_against_wrapped_uses_rate() {
        let Ok(price) = concerns().spot_price(&pool(1500, 500, "1.1"), addr(1), addr(2)) else {
            panic!("price");
        };
        assert_eq!(price, fp("1.1"));
    }

    #[test]
    fn spot_price_of_bpt_below_lower_target() {
        // main 900 (nominal 899) + wrapped 1101 = 2000 over 2000 BPT
        let snapshot = pool(900, 1101, "1");
        let Ok(bpt_in_main) = concerns().spot_price(&snapshot, addr(1), snapshot.address()) else {
            panic!("price");
        };
        // one BPT is worth 1 nominal; main is worth 1.01 nominal per unit
        assert!(bpt_in_main < FixedPoint::ONE);
        assert!(bpt_in_main > fp("0.99"));
        let Ok(main_in_bpt) = concerns().spot_price(&snapshot, snapshot.address(), addr(1)) else {
            panic!("price");
        };
        assert!(main_in_bpt > FixedPoint::ONE);
    }

    #[test]
    fn missing_params_rejected() {
        let id = pool_id(0x12);
        let snapshot = PoolSnapshot::new(
            id,
            "ERC4626Linear",
            vec![
                token(1, e18(10)),
                PoolToken::new(id.address(), e18(1), Decimals::MAX),
                token(2, e18(10)),
            ],
            FixedPoint::ZERO,
            e18(20),
        );
        assert!(matches!(
            concerns().spot_price(&snapshot, addr(1), addr(2)),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }
}
