//! Closed set of pool families recognised by the dispatcher.

use core::fmt;
use core::str::FromStr;

use crate::error::AmmError;

/// Pool family a type tag resolves to.
///
/// Several tags share one family: `Investment` and
/// `LiquidityBootstrapping` are weighted pools, the known linear
/// protocol tags (`AaveLinear`, `ERC4626Linear`, ...) are linear pools, and `Gyro2`,
/// `Gyro3` and `GyroE` are Gyroscope pools.
///
/// # Examples
///
/// ```
/// use balancer_pool_core::domain::PoolType;
///
/// assert_eq!("Investment".parse::<PoolType>().expect("known"), PoolType::Weighted);
/// assert_eq!("EulerLinear".parse::<PoolType>().expect("known"), PoolType::Linear);
/// assert!("Element".parse::<PoolType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PoolType {
    /// Weighted product pools.
    Weighted = 0,
    /// StableSwap pools without rates.
    Stable = 1,
    /// StableSwap pools with price rates.
    MetaStable = 2,
    /// StableSwap pools holding their own BPT.
    ComposableStable = 3,
    /// Legacy phantom-BPT stable pools.
    StablePhantom = 4,
    /// Main/wrapped linear pools.
    Linear = 5,
    /// Oracle-valued FX pools.
    Fx = 6,
    /// Gyroscope concentrated pools.
    Gyro = 7,
}

impl PoolType {
    /// Every family, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Weighted,
        Self::Stable,
        Self::MetaStable,
        Self::ComposableStable,
        Self::StablePhantom,
        Self::Linear,
        Self::Fx,
        Self::Gyro,
    ];

    /// Returns `true` for the families that use the stable invariant.
    #[must_use]
    pub const fn is_stable_family(&self) -> bool {
        matches!(
            self,
            Self::Stable | Self::MetaStable | Self::ComposableStable | Self::StablePhantom
        )
    }

    /// Returns `true` if the pool lists its own BPT among its tokens.
    #[must_use]
    pub const fn holds_own_bpt(&self) -> bool {
        matches!(
            self,
            Self::ComposableStable | Self::StablePhantom | Self::Linear
        )
    }
}

impl FromStr for PoolType {
    type Err = AmmError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let kind = match tag {
            "Weighted" | "Investment" | "LiquidityBootstrapping" => Self::Weighted,
            "Stable" => Self::Stable,
            "MetaStable" => Self::MetaStable,
            "ComposableStable" => Self::ComposableStable,
            "StablePhantom" => Self::StablePhantom,
            "FX" => Self::Fx,
            "Gyro2" | "Gyro3" | "GyroE" => Self::Gyro,
            "Linear" | "AaveLinear" | "ERC4626Linear" | "BeefyLinear" | "EulerLinear"
            | "GearboxLinear" | "MidasLinear" | "ReaperLinear" | "SiloLinear" | "TetuLinear"
            | "YearnLinear" => Self::Linear,
            other => return Err(AmmError::UnsupportedPoolType(other.to_owned())),
        };
        Ok(kind)
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weighted => write!(f, "Weighted"),
            Self::Stable => write!(f, "Stable"),
            Self::MetaStable => write!(f, "MetaStable"),
            Self::ComposableStable => write!(f, "ComposableStable"),
            Self::StablePhantom => write!(f, "StablePhantom"),
            Self::Linear => write!(f, "Linear"),
            Self::Fx => write!(f, "FX"),
            Self::Gyro => write!(f, "Gyro"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(tag: &str) -> PoolType {
        let Ok(t) = tag.parse::<PoolType>() else {
            panic!("expected {tag} to parse");
        };
        t
    }

    #[test]
    fn weighted_aliases() {
        assert_eq!(parse("Weighted"), PoolType::Weighted);
        assert_eq!(parse("Investment"), PoolType::Weighted);
        assert_eq!(parse("LiquidityBootstrapping"), PoolType::Weighted);
    }

    #[test]
    fn linear_tags() {
        for tag in [
            "Linear",
            "AaveLinear",
            "ERC4626Linear",
            "BeefyLinear",
            "EulerLinear",
            "GearboxLinear",
            "MidasLinear",
            "ReaperLinear",
            "SiloLinear",
            "TetuLinear",
            "YearnLinear",
        ] {
            assert_eq!(parse(tag), PoolType::Linear);
        }
    }

    #[test]
    fn unlisted_linear_suffix_rejected() {
        for tag in ["BogusLinear", "NotARealPoolLinear"] {
            let Err(AmmError::UnsupportedPoolType(name)) = tag.parse::<PoolType>() else {
                panic!("{tag} should be unsupported");
            };
            assert_eq!(name, tag);
        }
    }

    #[test]
    fn linear_prefix_is_not_enough() {
        assert!("LinearV2".parse::<PoolType>().is_err());
    }

    #[test]
    fn gyro_tags() {
        for tag in ["Gyro2", "Gyro3", "GyroE"] {
            assert_eq!(parse(tag), PoolType::Gyro);
        }
    }

    #[test]
    fn unknown_tag_carries_name() {
        let Err(AmmError::UnsupportedPoolType(tag)) = "UnknownType".parse::<PoolType>() else {
            panic!("expected UnsupportedPoolType");
        };
        assert_eq!(tag, "UnknownType");
    }

    #[test]
    fn display_parses_back_except_gyro() {
        for kind in PoolType::ALL {
            if kind == PoolType::Gyro {
                continue;
            }
            assert_eq!(parse(&kind.to_string()), kind);
        }
    }

    #[test]
    fn families() {
        assert!(PoolType::MetaStable.is_stable_family());
        assert!(!PoolType::Fx.is_stable_family());
        assert!(PoolType::Linear.holds_own_bpt());
        assert!(!PoolType::Stable.holds_own_bpt());
    }
}
