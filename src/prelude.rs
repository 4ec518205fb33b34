//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use balancer_pool_core::prelude::*;
//! ```
//!
//! Brings the domain value types, the five concern traits, the dispatcher,
//! the swap builder and the error type into scope.

pub use crate::domain::{
    Address, Amount, Decimals, ExitKind, ExitRequest, ExitResult, JoinKind, JoinRequest,
    JoinResult, PoolId, PoolSnapshot, PoolToken, PoolType, Rounding, SlippageTolerance,
};

pub use crate::traits::{
    ExitConcern, JoinConcern, LiquidityConcern, PriceImpactConcern, SpotPriceConcern,
};

pub use crate::math::{CheckedArithmetic, FixedPoint};

pub use crate::config::{Network, NetworkConfig, SwapOptions};

pub use crate::error::{AmmError, Result};

pub use crate::factory::PoolTypeConcerns;

pub use crate::pools::PoolConcerns;

pub use crate::swaps::{compute_limits, Route, RouteStep, SwapBuilder, SwapKind, Swaps};
