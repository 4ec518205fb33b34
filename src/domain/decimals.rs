//! Token decimal places.

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Maximum allowed decimal places. Pool math runs at this precision.
const MAX_DECIMALS: u8 = 18;

/// Number of decimal places of an ERC-20 token.
///
/// Valid range is `0..=18`. Raw balances are multiplied by
/// [`scaling_factor`](Self::scaling_factor) to bring them to the 18-decimal
/// math domain.
///
/// # Examples
///
/// ```
/// use balancer_pool_core::domain::Decimals;
///
/// let usdc = Decimals::new(6).expect("6 is valid");
/// assert_eq!(usdc.scaling_factor(), 1_000_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Decimals(u8);

impl Default for Decimals {
    fn default() -> Self {
        Self::MAX
    }
}

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// Eighteen decimal places, the precision of BPT and of the math domain.
    pub const MAX: Self = Self(MAX_DECIMALS);

    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self, AmmError> {
        if value > MAX_DECIMALS {
            return Err(AmmError::InvalidConfiguration("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^(18 - decimals)`.
    #[must_use]
    pub const fn scaling_factor(&self) -> u128 {
        10u128.pow((MAX_DECIMALS - self.0) as u32)
    }
}

impl<'de> Deserialize<'de> for Decimals {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn valid_range() {
        for v in [0u8, 6, 8, 18] {
            let Ok(d) = Decimals::new(v) else {
                panic!("expected Ok for {v}");
            };
            assert_eq!(d.get(), v);
        }
    }

    #[test]
    fn invalid_nineteen() {
        let Err(e) = Decimals::new(19) else {
            panic!("expected Err");
        };
        assert_eq!(e, AmmError::InvalidConfiguration("decimals must be 0..=18"));
    }

    #[test]
    fn default_is_eighteen() {
        assert_eq!(Decimals::default(), Decimals::MAX);
    }

    #[test]
    fn scaling_factors() {
        assert_eq!(Decimals::MAX.scaling_factor(), 1);
        assert_eq!(Decimals::ZERO.scaling_factor(), 1_000_000_000_000_000_000);
        let Ok(wbtc) = Decimals::new(8) else {
            panic!("expected Ok");
        };
        assert_eq!(wbtc.scaling_factor(), 10_000_000_000);
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Decimals>("6").is_ok());
        assert!(serde_json::from_str::<Decimals>("24").is_err());
    }
}
