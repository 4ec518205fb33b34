//! Meta-stable pool concerns: the stable curve over rate-bearing tokens.
//!
//! Balances are multiplied by each token's price rate during upscaling, so
//! the curve sees values in a common unit. Spot prices are converted back
//! into whole-token units.

use super::stable::stable_family_concerns;
use crate::config::NetworkConfig;

/// Concerns of meta-stable pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaStableConcerns {
    network: NetworkConfig,
}

impl MetaStableConcerns {
    /// Creates meta-stable concerns for `network`.
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

stable_family_concerns!(MetaStableConcerns, |this| Some(&this.network));

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{JoinKind, JoinRequest, PoolSnapshot, SlippageTolerance};
    use crate::math::FixedPoint;
    use crate::pools::common::tests::{addr, e18, fp, mainnet, pool_id, token};
    use crate::traits::{JoinConcern, SpotPriceConcern};

    /// wstETH at rate 1.1 against WETH, balanced in value.
    fn wsteth_weth() -> PoolSnapshot {
        PoolSnapshot::new(
            pool_id(0x4e),
            "MetaStable",
            vec![
                token(1, e18(1000)).with_price_rate(fp("1.1")),
                token(2, e18(1100)),
            ],
            FixedPoint::ZERO,
            e18(2100),
        )
        .with_amp(50)
    }

    #[test]
    fn spot_price_reflects_rate() {
        let concerns = MetaStableConcerns::new(mainnet());
        // WETH paid per wstETH received
        let Ok(p) = concerns.spot_price(&wsteth_weth(), addr(2), addr(1)) else {
            panic!("price");
        };
        assert!(p > fp("1.0999"), "got {p}");
        assert!(p < fp("1.1001"), "got {p}");
    }

    #[test]
    fn value_balanced_join_has_no_impact() {
        let concerns = MetaStableConcerns::new(mainnet());
        let Ok(kind) = JoinKind::exact_tokens_in(vec![e18(10), e18(11)]) else {
            panic!("kind");
        };
        let request = JoinRequest::new(
            addr(0xa0),
            addr(0xa0),
            vec![addr(1), addr(2)],
            kind,
            SlippageTolerance::ZERO,
        );
        let Ok(result) = concerns.join(&wsteth_weth(), &request) else {
            panic!("join");
        };
        assert!(result.price_impact() < fp("0.000001"));
        // 1% of the pool's value
        let minted = result.expected_bpt_out().get();
        assert!(e18(21).get() - minted < 1_000_000_000, "minted {minted}");
    }
}
