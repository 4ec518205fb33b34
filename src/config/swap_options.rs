//! Defaults applied when building swaps.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, BasisPoints, SlippageTolerance};
use crate::error::AmmError;

/// Deadline used when the caller does not supply one: effectively never.
pub const DEFAULT_DEADLINE: u64 = 999_999_999_999_999_999;

/// Maximum number of pools a route may touch by default.
pub const DEFAULT_MAX_POOLS: usize = 4;

/// Default slippage tolerance, in basis points (0.1%).
pub const DEFAULT_MAX_SLIPPAGE_BPS: u32 = 10;

/// Options for route finding and swap building.
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides:
///
/// ```
/// use balancer_pool_core::config::SwapOptions;
///
/// let opts: SwapOptions = serde_json::from_str(r#"{"maxSlippage":50}"#).expect("valid");
/// assert_eq!(opts.max_slippage().bps(), 50);
/// assert_eq!(opts.max_pools(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwapOptions {
    max_pools: usize,
    max_slippage: SlippageTolerance,
    deadline: u64,
    gas_price: Amount,
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self {
            max_pools: DEFAULT_MAX_POOLS,
            max_slippage: SlippageTolerance::from_basis_points(BasisPoints::new(
                DEFAULT_MAX_SLIPPAGE_BPS,
            )),
            deadline: DEFAULT_DEADLINE,
            gas_price: Amount::new(1),
        }
    }
}

impl SwapOptions {
    /// Returns the maximum number of pools per route.
    #[must_use]
    pub const fn max_pools(&self) -> usize {
        self.max_pools
    }

    /// Returns the slippage tolerance.
    #[must_use]
    pub const fn max_slippage(&self) -> SlippageTolerance {
        self.max_slippage
    }

    /// Returns the deadline, in unix seconds.
    #[must_use]
    pub const fn deadline(&self) -> u64 {
        self.deadline
    }

    /// Returns the gas price handed to the route provider.
    #[must_use]
    pub const fn gas_price(&self) -> Amount {
        self.gas_price
    }

    /// Sets the maximum number of pools per route.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] for zero.
    pub const fn with_max_pools(mut self, max_pools: usize) -> Result<Self, AmmError> {
        if max_pools == 0 {
            return Err(AmmError::InvalidConfiguration("max pools must be positive"));
        }
        self.max_pools = max_pools;
        Ok(self)
    }

    /// Sets the slippage tolerance.
    #[must_use]
    pub const fn with_max_slippage(mut self, tolerance: SlippageTolerance) -> Self {
        self.max_slippage = tolerance;
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: u64) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sets the gas price.
    #[must_use]
    pub const fn with_gas_price(mut self, gas_price: Amount) -> Self {
        self.gas_price = gas_price;
        self
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = SwapOptions::default();
        assert_eq!(opts.max_pools(), 4);
        assert_eq!(opts.max_slippage().bps(), 10);
        assert_eq!(opts.deadline(), 999_999_999_999_999_999);
        assert_eq!(opts.gas_price(), Amount::new(1));
    }

    #[test]
    fn zero_max_pools_rejected() {
        assert!(SwapOptions::default().with_max_pools(0).is_err());
        let Ok(opts) = SwapOptions::default().with_max_pools(2) else {
            panic!("two pools is valid");
        };
        assert_eq!(opts.max_pools(), 2);
    }

    #[test]
    fn json_rejects_bad_tolerance() {
        assert!(serde_json::from_str::<SwapOptions>(r#"{"maxSlippage":10001}"#).is_err());
    }

    #[test]
    fn empty_json_is_default() {
        let Ok(opts) = serde_json::from_str::<SwapOptions>("{}") else {
            panic!("deserialize");
        };
        assert_eq!(opts, SwapOptions::default());
    }
}
