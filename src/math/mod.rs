//! Arithmetic and precision utilities for pool math.
//!
//! This module provides the [`FixedPoint`] 18-decimal type used by every
//! pool family, [`CheckedArithmetic`] for overflow-safe operations, the
//! rounding-aware integer division helpers, and natural log/exp.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`FixedPoint`] | `mul_down`/`mul_up`/`div_down`/`div_up`, `pow_down`/`pow_up`, `complement` |
//! | [`div_round`] | `u128` division with a [`Rounding`](crate::domain::Rounding) direction |
//! | [`ln`] / [`exp`] | natural log and exponential at 36-decimal internal precision |

mod checked;
mod fixed_point;
mod log_exp;
mod rounding;

pub use checked::CheckedArithmetic;
pub use fixed_point::{isqrt, FixedPoint, MAX_POW_RELATIVE_ERROR};
pub use log_exp::{exp, ln};
pub use rounding::{div_round, div_round_u256};
