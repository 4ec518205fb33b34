//! Exit computation shared by every pool family.

use crate::domain::{ExitRequest, ExitResult, PoolSnapshot};
use crate::error::AmmError;

/// Computes exits for one pool family.
///
/// Token amounts the caller receives are rounded down, BPT the caller burns
/// is rounded up.
///
/// # Errors
///
/// - [`AmmError::PoolPaused`] for paused snapshots.
/// - [`AmmError::ExceedsPoolBalance`] when the exit asks for more of a token
///   than the pool holds, or burns more BPT than is in circulation.
/// - [`AmmError::UnsupportedOperation`] for exit kinds the family does not
///   offer (single-token exits on FX and Gyro pools).
pub trait ExitConcern {
    /// Computes the exit described by `request` against `snapshot`.
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn exit(&self, snapshot: &PoolSnapshot, request: &ExitRequest) -> Result<ExitResult, AmmError>;
}
