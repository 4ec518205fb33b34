//! Concern traits every pool family implements.
//!
//! A pool family is described by five independent concerns:
//!
//! - [`JoinConcern`]: deposit tokens, mint BPT;
//! - [`ExitConcern`]: burn BPT, withdraw tokens;
//! - [`SpotPriceConcern`]: marginal price between two tokens;
//! - [`PriceImpactConcern`]: loss against a zero-impact trade;
//! - [`LiquidityConcern`]: total value held by the pool.
//!
//! All of them are pure functions of an immutable
//! [`PoolSnapshot`](crate::domain::PoolSnapshot).

mod exit_concern;
mod join_concern;
mod liquidity_concern;
mod price_impact_concern;
mod spot_price_concern;

pub use exit_concern::ExitConcern;
pub use join_concern::JoinConcern;
pub use liquidity_concern::LiquidityConcern;
pub use price_impact_concern::PriceImpactConcern;
pub use spot_price_concern::SpotPriceConcern;
