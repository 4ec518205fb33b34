//! Two-pool arbitrage encoded as a vault `batchSwap`.
//!
//! A simple flash swap borrows `flash_loan_amount` of the first asset,
//! swaps it for the second asset in the first pool and back in the second
//! pool. The vault only settles net deltas, so the loan is repaid out of the
//! second leg; the zero limits make the transaction revert unless the wallet
//! ends with no net outflow of either asset.

use tracing::debug;

use super::builder::{BatchSwapStep, FundManagement, SwapAttributes, SwapCall, SwapFunction};
use super::route::SwapKind;
use crate::config::{NetworkConfig, DEFAULT_DEADLINE};
use crate::domain::{Address, Amount, PoolId};
use crate::error::AmmError;

/// A cyclic two-pool swap funded by the vault.
///
/// # Example
///
/// ```
/// use balancer_pool_core::config::{Network, NetworkConfig};
/// use balancer_pool_core::domain::{Address, Amount, PoolId};
/// use balancer_pool_core::swaps::{SimpleFlashSwap, SwapFunction};
///
/// let (dai, usdc) = (Address::from_bytes([1; 20]), Address::from_bytes([2; 20]));
/// let pools = [PoolId::from_bytes([7; 32]), PoolId::from_bytes([8; 32])];
/// let flash = SimpleFlashSwap::new(Amount::new(1_000), &pools, &[dai, usdc], dai)
///     .expect("two pools, two assets");
///
/// let network = NetworkConfig::for_network(Network::Mainnet).expect("built in");
/// let attributes = flash.attributes(&network);
/// assert_eq!(attributes.function, SwapFunction::BatchSwap);
/// assert_eq!(attributes.asset_limits, vec![0, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleFlashSwap {
    flash_loan_amount: Amount,
    pool_ids: [PoolId; 2],
    assets: [Address; 2],
    wallet: Address,
    deadline: u64,
}

impl SimpleFlashSwap {
    /// Creates a flash swap borrowing `flash_loan_amount` of `assets[0]`,
    /// trading through `pool_ids[0]` then `pool_ids[1]`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] unless there are exactly two
    ///   pools and two distinct assets.
    /// - [`AmmError::InvalidAmount`] for a zero loan.
    pub fn new(
        flash_loan_amount: Amount,
        pool_ids: &[PoolId],
        assets: &[Address],
        wallet: Address,
    ) -> Result<Self, AmmError> {
        let &[first_pool, second_pool] = pool_ids else {
            return Err(AmmError::InvalidConfiguration(
                "a simple flash swap needs exactly two pools",
            ));
        };
        let &[borrowed, traded] = assets else {
            return Err(AmmError::InvalidConfiguration(
                "a simple flash swap needs exactly two assets",
            ));
        };
        if borrowed == traded {
            return Err(AmmError::InvalidConfiguration("duplicate asset in flash swap"));
        }
        if flash_loan_amount.is_zero() {
            return Err(AmmError::InvalidAmount("flash loan amount must be positive"));
        }
        Ok(Self {
            flash_loan_amount,
            pool_ids: [first_pool, second_pool],
            assets: [borrowed, traded],
            wallet,
            deadline: DEFAULT_DEADLINE,
        })
    }

    /// Replaces the default far-future deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: u64) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub const fn flash_loan_amount(&self) -> Amount {
        self.flash_loan_amount
    }

    #[must_use]
    pub const fn pool_ids(&self) -> &[PoolId; 2] {
        &self.pool_ids
    }

    #[must_use]
    pub const fn assets(&self) -> &[Address; 2] {
        &self.assets
    }

    #[must_use]
    pub const fn wallet(&self) -> Address {
        self.wallet
    }

    #[must_use]
    pub const fn deadline(&self) -> u64 {
        self.deadline
    }

    /// `batchSwap` arguments: given-in, `0 → 1` for the loan amount, then
    /// `1 → 0` chaining the whole output, zero limits.
    #[must_use]
    pub fn to_call(&self) -> SwapCall {
        let [first_pool, second_pool] = self.pool_ids;
        SwapCall::Batch {
            kind: SwapKind::GivenIn,
            swaps: vec![
                BatchSwapStep {
                    pool_id: first_pool,
                    asset_in_index: 0,
                    asset_out_index: 1,
                    amount: self.flash_loan_amount,
                    user_data: Vec::new(),
                },
                BatchSwapStep {
                    pool_id: second_pool,
                    asset_in_index: 1,
                    asset_out_index: 0,
                    amount: Amount::ZERO,
                    user_data: Vec::new(),
                },
            ],
            assets: self.assets.to_vec(),
            funds: FundManagement::external(self.wallet, self.wallet),
            limits: vec![0; 2],
            deadline: self.deadline,
        }
    }

    /// Full transaction attributes against the network's vault. No native
    /// value is attached: the loan comes from the vault.
    #[must_use]
    pub fn attributes(&self, network: &NetworkConfig) -> SwapAttributes {
        let [first_pool, second_pool] = &self.pool_ids;
        debug!(
            amount = %self.flash_loan_amount,
            %first_pool,
            %second_pool,
            "built simple flash swap"
        );
        SwapAttributes {
            to: network.vault(),
            function: SwapFunction::BatchSwap,
            call: self.to_call(),
            value: Amount::ZERO,
            asset_limits: vec![0; 2],
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::Network;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn pool(byte: u8) -> PoolId {
        PoolId::from_bytes([byte; 32])
    }

    fn flash() -> SimpleFlashSwap {
        let Ok(flash) = SimpleFlashSwap::new(
            Amount::new(1_000_000),
            &[pool(7), pool(8)],
            &[addr(1), addr(2)],
            addr(9),
        ) else {
            panic!("valid flash swap");
        };
        flash
    }

    #[test]
    fn two_pool_cycle_layout() {
        let SwapCall::Batch {
            kind,
            swaps,
            assets,
            funds,
            limits,
            deadline,
        } = flash().to_call()
        else {
            panic!("flash swaps are batch swaps");
        };
        assert_eq!(kind, SwapKind::GivenIn);
        assert_eq!(assets, vec![addr(1), addr(2)]);
        assert_eq!(limits, vec![0, 0]);
        assert_eq!(deadline, DEFAULT_DEADLINE);
        assert_eq!(funds, FundManagement::external(addr(9), addr(9)));

        let [first, second] = swaps.as_slice() else {
            panic!("two steps expected");
        };
        assert_eq!(first.pool_id, pool(7));
        assert_eq!((first.asset_in_index, first.asset_out_index), (0, 1));
        assert_eq!(first.amount, Amount::new(1_000_000));
        assert_eq!(second.pool_id, pool(8));
        assert_eq!((second.asset_in_index, second.asset_out_index), (1, 0));
        assert_eq!(second.amount, Amount::ZERO);
        assert!(first.user_data.is_empty() && second.user_data.is_empty());
    }

    #[test]
    fn attributes_target_vault_with_batch_swap() {
        let Ok(network) = NetworkConfig::for_network(Network::Polygon) else {
            panic!("built in");
        };
        let attributes = flash().with_deadline(1_700_000_000).attributes(&network);
        assert_eq!(attributes.to, network.vault());
        assert_eq!(attributes.function, SwapFunction::BatchSwap);
        assert_eq!(attributes.value, Amount::ZERO);
        assert_eq!(attributes.asset_limits, vec![0, 0]);
        let SwapCall::Batch { deadline, .. } = attributes.call else {
            panic!("batch call");
        };
        assert_eq!(deadline, 1_700_000_000);
    }

    #[test]
    fn wrong_pool_count_rejected() {
        let result =
            SimpleFlashSwap::new(Amount::new(1), &[pool(7)], &[addr(1), addr(2)], addr(9));
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
        let result = SimpleFlashSwap::new(
            Amount::new(1),
            &[pool(7), pool(8), pool(9)],
            &[addr(1), addr(2)],
            addr(9),
        );
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
    }

    #[test]
    fn wrong_or_duplicate_assets_rejected() {
        let result =
            SimpleFlashSwap::new(Amount::new(1), &[pool(7), pool(8)], &[addr(1)], addr(9));
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
        let result = SimpleFlashSwap::new(
            Amount::new(1),
            &[pool(7), pool(8)],
            &[addr(1), addr(1)],
            addr(9),
        );
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
    }

    #[test]
    fn zero_loan_rejected() {
        let result = SimpleFlashSwap::new(
            Amount::ZERO,
            &[pool(7), pool(8)],
            &[addr(1), addr(2)],
            addr(9),
        );
        assert!(matches!(result, Err(AmmError::InvalidAmount(_))));
    }
}
