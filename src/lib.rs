//! # Balancer Pool Core
//!
//! Pool math and slippage-bounded swap building for Balancer-style AMM
//! pools.
//!
//! Given an immutable [`PoolSnapshot`](domain::PoolSnapshot), the crate
//! computes joins, exits, spot prices, price impact and liquidity for eight
//! pool families:
//!
//! - **Weighted** (including Investment and Liquidity Bootstrapping pools)
//! - **Stable**, **MetaStable**, **ComposableStable** and **StablePhantom**
//! - **Linear** (Aave, ERC4626, Euler, Gearbox, ... wrappers)
//! - **FX**
//! - **Gyro** 2-CLP, 3-CLP and E-CLP
//!
//! Given a route from an external router, it assembles a vault `swap` or
//! `batchSwap` with one signed limit per asset.
//!
//! Everything is a pure, synchronous function of its inputs: no network
//! access, no shared state. Node RPC, pool discovery, route finding and ABI
//! encoding are caller-supplied through the traits in [`swaps`].
//!
//! # Quick Start
//!
//! ```rust
//! use balancer_pool_core::config::{Network, NetworkConfig};
//! use balancer_pool_core::domain::{
//!     Address, Amount, Decimals, JoinKind, JoinRequest, PoolId, PoolSnapshot, PoolToken,
//!     SlippageTolerance,
//! };
//! use balancer_pool_core::factory::PoolTypeConcerns;
//! use balancer_pool_core::traits::JoinConcern;
//!
//! const E18: u128 = 1_000_000_000_000_000_000;
//!
//! let network = NetworkConfig::for_network(Network::Mainnet).expect("built in");
//! let (wbtc, weth) = (Address::from_bytes([1; 20]), Address::from_bytes([2; 20]));
//! let half = "0.5".parse().expect("literal");
//!
//! // 1. A 50/50 weighted pool with 0.3% swap fee
//! let pool = PoolSnapshot::new(
//!     PoolId::from_bytes([0xab; 32]),
//!     "Weighted",
//!     vec![
//!         PoolToken::new(wbtc, Amount::new(100 * E18), Decimals::MAX).with_weight(half),
//!         PoolToken::new(weth, Amount::new(100 * E18), Decimals::MAX).with_weight(half),
//!     ],
//!     "0.003".parse().expect("literal"),
//!     Amount::new(200 * E18),
//! );
//!
//! // 2. Resolve the pool family from its tag
//! let concerns = PoolTypeConcerns::resolve(pool.pool_type(), &network).expect("known tag");
//!
//! // 3. Join with one of each token, accepting 0.5% slippage
//! let request = JoinRequest::new(
//!     wbtc,
//!     wbtc,
//!     vec![wbtc, weth],
//!     JoinKind::exact_tokens_in(vec![Amount::new(E18), Amount::new(E18)]).expect("amounts"),
//!     SlippageTolerance::new(50).expect("0.5%"),
//! );
//! let result = concerns.join(&pool, &request).expect("join");
//!
//! assert!(result.expected_bpt_out().get() > 0);
//! assert!(result.min_bpt_out() < result.expected_bpt_out());
//! assert_eq!(result.to(), network.vault());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer    │  snapshot + request, or route + tolerance
//! └──────┬───────┘
//!        │ PoolTypeConcerns::resolve(tag)
//!        ▼
//! ┌──────────────┐
//! │   Factory     │  tag → PoolType → PoolConcerns
//! └──────┬───────┘
//!        │ PoolConcerns (enum dispatch)
//!        ▼
//! ┌──────────────┐        ┌──────────────┐
//! │    Pools      │        │    Swaps      │  route → limits → swap / batchSwap
//! └──────┬───────┘        └──────┬───────┘
//!        │ *_math modules        │
//!        ▼                       ▼
//! ┌─────────────────────────────────────┐
//! │   Math + Domain                      │  FixedPoint, Amount, PoolSnapshot, …
//! └─────────────────────────────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`PoolSnapshot`](domain::PoolSnapshot), [`Amount`](domain::Amount), join/exit requests and results |
//! | [`traits`] | The five concerns: [`JoinConcern`](traits::JoinConcern), [`ExitConcern`](traits::ExitConcern), [`SpotPriceConcern`](traits::SpotPriceConcern), [`PriceImpactConcern`](traits::PriceImpactConcern), [`LiquidityConcern`](traits::LiquidityConcern) |
//! | [`pools`]  | Per-family concerns, invariant math and the [`PoolConcerns`](pools::PoolConcerns) dispatch enum |
//! | [`factory`] | [`PoolTypeConcerns`](factory::PoolTypeConcerns), tag to concerns |
//! | [`swaps`]  | [`SwapBuilder`](swaps::SwapBuilder), [`compute_limits`](swaps::compute_limits) and the [`Swaps`](swaps::Swaps) facade |
//! | [`config`] | [`NetworkConfig`](config::NetworkConfig) and [`SwapOptions`](config::SwapOptions) |
//! | [`math`]   | [`FixedPoint`](math::FixedPoint), checked arithmetic, log/exp |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (`debug` for resolved pools and
//! built results, `trace` inside the invariant solvers, `warn` on
//! non-convergence and clamped price impact) and never installs a
//! subscriber.

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod swaps;
pub mod traits;
