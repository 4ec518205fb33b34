//! Marginal price queries.

use crate::domain::{Address, PoolSnapshot};
use crate::error::AmmError;
use crate::math::FixedPoint;

/// Marginal exchange rate between two tokens of a pool.
pub trait SpotPriceConcern {
    /// Units of `token_in` paid per unit of `token_out` received, at the
    /// margin, swap fee included. Units are whole tokens (decimals removed).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if either token is not in the pool or
    ///   both are the same.
    /// - [`AmmError::UnsupportedOperation`] for curves without a closed-form
    ///   marginal price.
    fn spot_price(
        &self,
        snapshot: &PoolSnapshot,
        token_in: Address,
        token_out: Address,
    ) -> Result<FixedPoint, AmmError>;
}
