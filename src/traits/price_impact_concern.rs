//! Price impact of joins and exits.

use crate::domain::{Amount, PoolSnapshot};
use crate::error::AmmError;
use crate::math::FixedPoint;

/// Price impact of adding or removing liquidity.
///
/// The impact compares `bpt_amount` with the BPT the same token amounts
/// would be worth at the current marginal prices:
///
/// ```text
/// join: 1 − bpt / bpt_zero_impact
/// exit: bpt / bpt_zero_impact − 1
/// ```
///
/// The result is clamped to `[0, 1]`.
pub trait PriceImpactConcern {
    /// Returns the price impact in `[0, 1]`.
    ///
    /// `amounts` holds one raw amount per non-BPT pool token, in pool order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `amounts` does not match the
    ///   pool's token count.
    /// - [`AmmError::InsufficientLiquidity`] if the pool has no supply.
    /// - [`AmmError::UnsupportedOperation`] for curves without marginal
    ///   prices.
    fn price_impact(
        &self,
        snapshot: &PoolSnapshot,
        amounts: &[Amount],
        bpt_amount: Amount,
        is_join: bool,
    ) -> Result<FixedPoint, AmmError>;
}
