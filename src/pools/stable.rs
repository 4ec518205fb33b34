//! Stable pool concerns.
//!
//! Plain `Stable` pools hold tokens without rates. The other stable
//! families ([`MetaStableConcerns`](super::MetaStableConcerns),
//! [`ComposableStableConcerns`](super::ComposableStableConcerns),
//! [`StablePhantomConcerns`](super::StablePhantomConcerns)) share the same
//! curve through [`StableCurve`]; rates come in through upscaling and the
//! pool's own BPT is dropped by the shared plumbing.

use super::common::{BptMath, ScaledPool};
use super::stable_math;
use crate::config::NetworkConfig;
use crate::error::AmmError;
use crate::math::FixedPoint;

/// The stable invariant plugged into the shared join/exit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct StableCurve;

fn amp(pool: &ScaledPool<'_>) -> Result<u64, AmmError> {
    pool.snapshot()
        .amp()
        .ok_or(AmmError::InvalidConfiguration("stable pool without amplification"))
}

impl StableCurve {
    pub(crate) fn spot_price(
        self,
        snapshot: &crate::domain::PoolSnapshot,
        token_in: crate::domain::Address,
        token_out: crate::domain::Address,
    ) -> Result<FixedPoint, AmmError> {
        let pool = ScaledPool::new(snapshot)?;
        let (i, o) = pool.pair(token_in, token_out)?;
        let scaled = stable_math::spot_price(amp(&pool)?, pool.balances(), i, o, pool.fee())?;
        pool.unscale_price(i, o, scaled)
    }
}

impl BptMath for StableCurve {
    fn bpt_out_given_exact_tokens_in(
        &self,
        pool: &ScaledPool<'_>,
        amounts_in: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        let amp = amp(pool)?;
        let invariant = stable_math::calculate_invariant(amp, pool.balances())?;
        stable_math::bpt_out_given_exact_tokens_in(
            amp,
            pool.balances(),
            amounts_in,
            pool.supply(),
            invariant,
            pool.fee(),
        )
    }

    fn bpt_zero_price_impact(
        &self,
        pool: &ScaledPool<'_>,
        amounts: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        stable_math::bpt_zero_price_impact(amp(pool)?, pool.balances(), amounts, pool.supply())
    }

    fn bpt_in_given_exact_tokens_out(
        &self,
        pool: &ScaledPool<'_>,
        amounts_out: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        let amp = amp(pool)?;
        let invariant = stable_math::calculate_invariant(amp, pool.balances())?;
        stable_math::bpt_in_given_exact_tokens_out(
            amp,
            pool.balances(),
            amounts_out,
            pool.supply(),
            invariant,
            pool.fee(),
        )
    }

    fn token_out_given_exact_bpt_in(
        &self,
        pool: &ScaledPool<'_>,
        index: usize,
        bpt_in: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        let amp = amp(pool)?;
        let invariant = stable_math::calculate_invariant(amp, pool.balances())?;
        stable_math::token_out_given_exact_bpt_in(
            amp,
            pool.balances(),
            index,
            bpt_in,
            pool.supply(),
            invariant,
            pool.fee(),
        )
    }
}

/// Implements the concern traits of a stable-family type on top of
/// [`StableCurve`]. `$network` maps `&self` to the optional network
/// configuration used for native-asset joins and exits.
macro_rules! stable_family_concerns {
    ($ty:ty, |$this:ident| $network:expr) => {
        impl $crate::traits::JoinConcern for $ty {
            fn join(
                &self,
                snapshot: &$crate::domain::PoolSnapshot,
                request: &$crate::domain::JoinRequest,
            ) -> Result<$crate::domain::JoinResult, $crate::error::AmmError> {
                let $this = self;
                $crate::pools::common::join_with(
                    &$crate::pools::stable::StableCurve,
                    snapshot,
                    request,
                    $network,
                )
            }
        }

        impl $crate::traits::ExitConcern for $ty {
            fn exit(
                &self,
                snapshot: &$crate::domain::PoolSnapshot,
                request: &$crate::domain::ExitRequest,
            ) -> Result<$crate::domain::ExitResult, $crate::error::AmmError> {
                let $this = self;
                $crate::pools::common::exit_with(
                    &$crate::pools::stable::StableCurve,
                    snapshot,
                    request,
                    $network,
                )
            }
        }

        impl $crate::traits::SpotPriceConcern for $ty {
            fn spot_price(
                &self,
                snapshot: &$crate::domain::PoolSnapshot,
                token_in: $crate::domain::Address,
                token_out: $crate::domain::Address,
            ) -> Result<$crate::math::FixedPoint, $crate::error::AmmError> {
                $crate::pools::stable::StableCurve.spot_price(snapshot, token_in, token_out)
            }
        }

        impl $crate::traits::PriceImpactConcern for $ty {
            fn price_impact(
                &self,
                snapshot: &$crate::domain::PoolSnapshot,
                amounts: &[$crate::domain::Amount],
                bpt_amount: $crate::domain::Amount,
                is_join: bool,
            ) -> Result<$crate::math::FixedPoint, $crate::error::AmmError> {
                $crate::pools::common::price_impact_with(
                    &$crate::pools::stable::StableCurve,
                    snapshot,
                    amounts,
                    bpt_amount,
                    is_join,
                )
            }
        }

        impl $crate::traits::LiquidityConcern for $ty {
            fn liquidity(
                &self,
                snapshot: &$crate::domain::PoolSnapshot,
                token_prices: &[Option<$crate::math::FixedPoint>],
            ) -> Result<$crate::math::FixedPoint, $crate::error::AmmError> {
                $crate::pools::common::liquidity_with_mean_price(snapshot, token_prices)
            }
        }
    };
}

pub(crate) use stable_family_concerns;

/// Concerns of plain stable pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableConcerns {
    network: NetworkConfig,
}

impl StableConcerns {
    /// Creates stable concerns for `network`.
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

stable_family_concerns!(StableConcerns, |this| Some(&this.network));
