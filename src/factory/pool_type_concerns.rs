//! Pool-type tag to concern-set dispatcher.

use tracing::debug;

use crate::config::NetworkConfig;
use crate::domain::PoolType;
use crate::error::AmmError;
use crate::pools::{
    ComposableStableConcerns, FxConcerns, GyroConcerns, LinearConcerns, MetaStableConcerns,
    PoolConcerns, StableConcerns, StablePhantomConcerns, WeightedConcerns,
};

/// Stateless dispatcher from a pool-type tag to its [`PoolConcerns`].
///
/// # Example
///
/// ```rust
/// use balancer_pool_core::config::{Network, NetworkConfig};
/// use balancer_pool_core::domain::PoolType;
/// use balancer_pool_core::factory::PoolTypeConcerns;
///
/// let network = NetworkConfig::for_network(Network::Mainnet).expect("built in");
/// let concerns = PoolTypeConcerns::resolve("ERC4626Linear", &network).expect("known tag");
/// assert_eq!(concerns.pool_type(), PoolType::Linear);
/// assert!(PoolTypeConcerns::resolve("Element", &network).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolTypeConcerns;

impl PoolTypeConcerns {
    /// Resolves `tag` into the concerns of its family.
    ///
    /// Weighted, stable, meta-stable, composable-stable and linear concerns
    /// keep a copy of `network` to map the native asset onto the wrapped
    /// native token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnsupportedPoolType`] for unknown tags.
    pub fn resolve(tag: &str, network: &NetworkConfig) -> Result<PoolConcerns, AmmError> {
        let pool_type: PoolType = tag.parse()?;
        let concerns = Self::for_type(pool_type, network);
        debug!(tag, %pool_type, chain_id = network.chain_id(), "resolved pool concerns");
        Ok(concerns)
    }

    /// Concerns of an already parsed family.
    #[must_use]
    pub const fn for_type(pool_type: PoolType, network: &NetworkConfig) -> PoolConcerns {
        match pool_type {
            PoolType::Weighted => PoolConcerns::Weighted(WeightedConcerns::new(*network)),
            PoolType::Stable => PoolConcerns::Stable(StableConcerns::new(*network)),
            PoolType::MetaStable => PoolConcerns::MetaStable(MetaStableConcerns::new(*network)),
            PoolType::ComposableStable => {
                PoolConcerns::ComposableStable(ComposableStableConcerns::new(*network))
            }
            PoolType::StablePhantom => PoolConcerns::StablePhantom(StablePhantomConcerns::new()),
            PoolType::Linear => PoolConcerns::Linear(LinearConcerns::new(*network)),
            PoolType::Fx => PoolConcerns::Fx(FxConcerns::new()),
            PoolType::Gyro => PoolConcerns::Gyro(GyroConcerns::new()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::Network;

    fn mainnet() -> NetworkConfig {
        let Ok(cfg) = NetworkConfig::for_network(Network::Mainnet) else {
            panic!("mainnet is built in");
        };
        cfg
    }

    #[test]
    fn every_tag_resolves_to_its_family() {
        let cases = [
            ("Weighted", PoolType::Weighted),
            ("Investment", PoolType::Weighted),
            ("LiquidityBootstrapping", PoolType::Weighted),
            ("Stable", PoolType::Stable),
            ("MetaStable", PoolType::MetaStable),
            ("ComposableStable", PoolType::ComposableStable),
            ("StablePhantom", PoolType::StablePhantom),
            ("AaveLinear", PoolType::Linear),
            ("GearboxLinear", PoolType::Linear),
            ("FX", PoolType::Fx),
            ("Gyro2", PoolType::Gyro),
            ("Gyro3", PoolType::Gyro),
            ("GyroE", PoolType::Gyro),
        ];
        for (tag, expected) in cases {
            let Ok(concerns) = PoolTypeConcerns::resolve(tag, &mainnet()) else {
                panic!("{tag} should resolve");
            };
            assert_eq!(concerns.pool_type(), expected, "{tag}");
        }
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        assert_eq!(
            PoolTypeConcerns::resolve("Element", &mainnet()),
            Err(AmmError::UnsupportedPoolType("Element".to_owned()))
        );
        assert_eq!(
            PoolTypeConcerns::resolve("BogusLinear", &mainnet()),
            Err(AmmError::UnsupportedPoolType("BogusLinear".to_owned()))
        );
    }

    #[test]
    fn network_travels_with_families_that_need_it() {
        let network = mainnet();
        let PoolConcerns::Linear(linear) = PoolTypeConcerns::for_type(PoolType::Linear, &network)
        else {
            panic!("linear");
        };
        assert_eq!(linear.network(), &network);
        assert_eq!(
            PoolTypeConcerns::for_type(PoolType::StablePhantom, &network),
            PoolConcerns::StablePhantom(StablePhantomConcerns::new())
        );
    }
}
