//! Slippage-bounded vault swaps over externally computed routes.
//!
//! A [`Route`] comes from an external router ([`RouteProvider`]).
//! [`SwapBuilder`] turns it into a [`SwapTransaction`]: the vault as call
//! target, `swap` or `batchSwap` with abstract arguments, the native value
//! and one signed limit per route asset computed by [`compute_limits`].
//! Encoding into ABI call data is left to a [`CallDataEncoder`].
//!
//! [`Swaps`] bundles these steps per network, with the defaults of
//! [`SwapOptions`](crate::config::SwapOptions). [`SimpleFlashSwap`] encodes
//! a two-pool arbitrage cycle as a `batchSwap` with zero limits.

mod builder;
mod facade;
mod flash_swap;
mod join_exit;
mod limits;
mod providers;
mod route;

pub use builder::{
    BatchSwapStep, FundManagement, SingleSwap, SwapAttributes, SwapBuilder, SwapCall,
    SwapFunction, SwapTransaction,
};
pub use facade::{BuildSwapParams, Swaps};
pub use flash_swap::SimpleFlashSwap;
pub use join_exit::{can_use_join_exit, some_join_exit};
pub use limits::{compute_limits, get_limits_for_slippage, limits_for_swap_kind};
pub use providers::{
    CallDataEncoder, PoolSnapshotProvider, RouteBuildError, RouteProvider, RouteRequest,
};
pub use route::{Route, RouteStep, SwapKind};
