//! Total value locked in a pool.

use crate::domain::PoolSnapshot;
use crate::error::AmmError;
use crate::math::FixedPoint;

/// Values a pool's holdings from per-token prices.
pub trait LiquidityConcern {
    /// Sums `balance · price` over the non-BPT tokens.
    ///
    /// `token_prices` holds one optional price per non-BPT token, in pool
    /// order, quoted per whole token. Missing prices are estimated from the
    /// known ones in a family-specific way.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `token_prices` does not match
    ///   the pool's token count.
    /// - [`AmmError::InvalidToken`] if no price is known.
    fn liquidity(
        &self,
        snapshot: &PoolSnapshot,
        token_prices: &[Option<FixedPoint>],
    ) -> Result<FixedPoint, AmmError>;
}
