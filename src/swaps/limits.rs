//! Slippage limits for vault swaps.
//!
//! Deltas follow the vault's sign convention: positive amounts are paid by
//! the caller, negative amounts are received by the caller. A limit is
//! never more favourable to the caller's counterparty than the delta it
//! bounds:
//!
//! | Delta | Limit |
//! |-------|-------|
//! | `d > 0` | `ceil(d · (1 + t))` |
//! | `d < 0` | `-floor(abs(d) · (1 - t))` |
//! | `0` | `0` |

use super::route::SwapKind;
use crate::domain::{Address, Amount, SlippageTolerance};
use crate::error::AmmError;

/// Bounds every delta by `tolerance`.
///
/// A zero tolerance returns the deltas unchanged.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if a bound leaves the `i128` range.
///
/// # Example
///
/// ```
/// use balancer_pool_core::domain::SlippageTolerance;
/// use balancer_pool_core::swaps::compute_limits;
///
/// let one_percent = SlippageTolerance::new(100).expect("valid");
/// let limits = compute_limits(&[1_000, -500, 0], one_percent).expect("fits");
/// assert_eq!(limits, vec![1_010, -495, 0]);
/// ```
pub fn compute_limits(deltas: &[i128], tolerance: SlippageTolerance) -> Result<Vec<i128>, AmmError> {
    deltas.iter().map(|d| bound(*d, tolerance)).collect()
}

fn bound(delta: i128, tolerance: SlippageTolerance) -> Result<i128, AmmError> {
    let magnitude = Amount::new(delta.unsigned_abs());
    if delta > 0 {
        tolerance.grow(magnitude)?.to_signed()
    } else if delta < 0 {
        Ok(-tolerance.shrink(magnitude)?.to_signed()?)
    } else {
        Ok(0)
    }
}

/// Limits for a swap whose fixed side is given by `kind`.
///
/// Assets in `tokens_in` keep their delta on a given-in swap, assets in
/// `tokens_out` keep theirs on a given-out swap; every other asset is
/// bounded by `tolerance`.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] when `deltas` and `assets` differ
///   in length.
/// - [`AmmError::Overflow`] if a bound leaves the `i128` range.
pub fn get_limits_for_slippage(
    tokens_in: &[Address],
    tokens_out: &[Address],
    kind: SwapKind,
    deltas: &[i128],
    assets: &[Address],
    tolerance: SlippageTolerance,
) -> Result<Vec<i128>, AmmError> {
    if deltas.len() != assets.len() {
        return Err(AmmError::InvalidConfiguration("one delta per asset expected"));
    }
    let fixed = match kind {
        SwapKind::GivenIn => tokens_in,
        SwapKind::GivenOut => tokens_out,
    };
    assets
        .iter()
        .zip(deltas)
        .map(|(asset, delta)| {
            if fixed.contains(asset) {
                Ok(*delta)
            } else {
                bound(*delta, tolerance)
            }
        })
        .collect()
}

/// Single-pair form of [`get_limits_for_slippage`].
///
/// # Errors
///
/// Same as [`get_limits_for_slippage`].
pub fn limits_for_swap_kind(
    kind: SwapKind,
    token_in: Address,
    token_out: Address,
    deltas: &[i128],
    assets: &[Address],
    tolerance: SlippageTolerance,
) -> Result<Vec<i128>, AmmError> {
    get_limits_for_slippage(&[token_in], &[token_out], kind, deltas, assets, tolerance)
}
