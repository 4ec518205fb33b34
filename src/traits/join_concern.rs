//! Join computation shared by every pool family.
//!
//! [`JoinConcern`] turns a [`JoinRequest`] into a fully bounded
//! [`JoinResult`]: the vault call to submit, the expected BPT, the slippage
//! floor on it and the price impact of the deposit.
//!
//! # Rounding
//!
//! Token amounts the caller pays are rounded up, BPT the caller receives is
//! rounded down. Both directions favour the pool.
//!
//! # Dispatch Model
//!
//! Concerns are dispatched through the `PoolConcerns` enum (not `dyn`
//! trait objects); see the `pools` module.

use crate::domain::{JoinRequest, JoinResult, PoolSnapshot};
use crate::error::AmmError;

/// Computes joins for one pool family.
///
/// Implementors are stateless: everything they need comes from the
/// snapshot and the request.
///
/// # Implementors
///
/// - `WeightedConcerns`: exact-tokens-in with the taxable/non-taxable split
/// - `StableConcerns`, `MetaStableConcerns`, `ComposableStableConcerns`,
///   `StablePhantomConcerns`: stable invariant
/// - `LinearConcerns`: main/wrapped nominal balances
/// - `FxConcerns`, `GyroConcerns`: proportional only
///
/// # Errors
///
/// Common error variants:
///
/// - [`AmmError::PoolPaused`]: the snapshot is paused
/// - [`AmmError::InvalidConfiguration`]: amounts or tokens do not match the
///   pool's token count
/// - [`AmmError::InvalidToken`]: a supplied token is not the pool's token at
///   that position
/// - [`AmmError::InsufficientLiquidity`]: the pool has no supply or the join
///   would mint no BPT
pub trait JoinConcern {
    /// Computes the join described by `request` against `snapshot`.
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn join(&self, snapshot: &PoolSnapshot, request: &JoinRequest) -> Result<JoinResult, AmmError>;
}
