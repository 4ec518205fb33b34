//! Enum dispatch over every pool family's concerns.
//!
//! [`PoolConcerns`] wraps the concern set of each family behind a single
//! enum, so callers can hold the result of
//! [`PoolTypeConcerns::resolve`](crate::factory::PoolTypeConcerns::resolve)
//! without `dyn` trait objects.

use super::{
    ComposableStableConcerns, FxConcerns, GyroConcerns, LinearConcerns, MetaStableConcerns,
    StableConcerns, StablePhantomConcerns, WeightedConcerns,
};
use crate::domain::{
    Address, Amount, ExitRequest, ExitResult, JoinRequest, JoinResult, PoolSnapshot, PoolType,
};
use crate::error::AmmError;
use crate::math::FixedPoint;
use crate::traits::{
    ExitConcern, JoinConcern, LiquidityConcern, PriceImpactConcern, SpotPriceConcern,
};

/// Concern set of one pool family.
///
/// The enum implements every concern trait by delegating to the inner
/// family via `match`; the set of variants is closed and mirrors
/// [`PoolType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolConcerns {
    /// Weighted, investment and liquidity-bootstrapping pools.
    Weighted(WeightedConcerns),
    /// Plain stable pools.
    Stable(StableConcerns),
    /// Stable pools over rate-bearing tokens.
    MetaStable(MetaStableConcerns),
    /// Stable pools holding their own BPT.
    ComposableStable(ComposableStableConcerns),
    /// Legacy phantom-BPT stable pools.
    StablePhantom(StablePhantomConcerns),
    /// Main/wrapped linear pools.
    Linear(LinearConcerns),
    /// Oracle-valued FX pools.
    Fx(FxConcerns),
    /// Gyroscope pools.
    Gyro(GyroConcerns),
}

/// Delegates a method call to the inner concerns of every variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            PoolConcerns::Weighted(p) => p.$method($($arg),*),
            PoolConcerns::Stable(p) => p.$method($($arg),*),
            PoolConcerns::MetaStable(p) => p.$method($($arg),*),
            PoolConcerns::ComposableStable(p) => p.$method($($arg),*),
            PoolConcerns::StablePhantom(p) => p.$method($($arg),*),
            PoolConcerns::Linear(p) => p.$method($($arg),*),
            PoolConcerns::Fx(p) => p.$method($($arg),*),
            PoolConcerns::Gyro(p) => p.$method($($arg),*),
        }
    };
}

impl PoolConcerns {
    /// The family these concerns belong to.
    #[must_use]
    pub const fn pool_type(&self) -> PoolType {
        match self {
            Self::Weighted(_) => PoolType::Weighted,
            Self::Stable(_) => PoolType::Stable,
            Self::MetaStable(_) => PoolType::MetaStable,
            Self::ComposableStable(_) => PoolType::ComposableStable,
            Self::StablePhantom(_) => PoolType::StablePhantom,
            Self::Linear(_) => PoolType::Linear,
            Self::Fx(_) => PoolType::Fx,
            Self::Gyro(_) => PoolType::Gyro,
        }
    }

    /// Fails unless `snapshot` is a valid snapshot of this family.
    fn check(&self, snapshot: &PoolSnapshot) -> Result<(), AmmError> {
        if snapshot.kind()? != self.pool_type() {
            return Err(AmmError::UnsupportedPoolType(snapshot.pool_type().to_owned()));
        }
        snapshot.validate()
    }
}

impl JoinConcern for PoolConcerns {
    fn join(&self, snapshot: &PoolSnapshot, request: &JoinRequest) -> Result<JoinResult, AmmError> {
        self.check(snapshot)?;
        delegate!(self, join(snapshot, request))
    }
}

impl ExitConcern for PoolConcerns {
    fn exit(&self, snapshot: &PoolSnapshot, request: &ExitRequest) -> Result<ExitResult, AmmError> {
        self.check(snapshot)?;
        delegate!(self, exit(snapshot, request))
    }
}

impl SpotPriceConcern for PoolConcerns {
    fn spot_price(
        &self,
        snapshot: &PoolSnapshot,
        token_in: Address,
        token_out: Address,
    ) -> Result<FixedPoint, AmmError> {
        self.check(snapshot)?;
        delegate!(self, spot_price(snapshot, token_in, token_out))
    }
}

impl PriceImpactConcern for PoolConcerns {
    fn price_impact(
        &self,
        snapshot: &PoolSnapshot,
        amounts: &[Amount],
        bpt_amount: Amount,
        is_join: bool,
    ) -> Result<FixedPoint, AmmError> {
        self.check(snapshot)?;
        delegate!(self, price_impact(snapshot, amounts, bpt_amount, is_join))
    }
}

impl LiquidityConcern for PoolConcerns {
    fn liquidity(
        &self,
        snapshot: &PoolSnapshot,
        token_prices: &[Option<FixedPoint>],
    ) -> Result<FixedPoint, AmmError> {
        self.check(snapshot)?;
        delegate!(self, liquidity(snapshot, token_prices))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::pools::common::tests::{addr, e18, fp, mainnet, pool_id, token};

    fn weighted_snapshot() -> PoolSnapshot {
        PoolSnapshot::new(
            pool_id(0x01),
            "Investment",
            vec![
                token(1, e18(100)).with_weight(fp("0.5")),
                token(2, e18(100)).with_weight(fp("0.5")),
            ],
            FixedPoint::ZERO,
            e18(200),
        )
    }

    #[test]
    fn delegates_to_inner_family() {
        let concerns = PoolConcerns::Weighted(WeightedConcerns::new(mainnet()));
        assert_eq!(concerns.pool_type(), PoolType::Weighted);
        let Ok(price) = concerns.spot_price(&weighted_snapshot(), addr(1), addr(2)) else {
            panic!("price");
        };
        assert_eq!(price, FixedPoint::ONE);
    }

    #[test]
    fn rejects_snapshot_of_other_family() {
        let concerns = PoolConcerns::Fx(FxConcerns::new());
        assert_eq!(
            concerns.spot_price(&weighted_snapshot(), addr(1), addr(2)),
            Err(AmmError::UnsupportedPoolType("Investment".to_owned()))
        );
    }

    #[test]
    fn rejects_invalid_snapshot() {
        let concerns = PoolConcerns::Weighted(WeightedConcerns::new(mainnet()));
        let unnormalized = PoolSnapshot::new(
            pool_id(0x02),
            "Weighted",
            vec![
                token(1, e18(100)).with_weight(fp("0.7")),
                token(2, e18(100)).with_weight(fp("0.5")),
            ],
            FixedPoint::ZERO,
            e18(200),
        );
        assert!(matches!(
            concerns.liquidity(&unnormalized, &[Some(FixedPoint::ONE), None]),
            Err(AmmError::InvalidWeight(_))
        ));
    }
}
