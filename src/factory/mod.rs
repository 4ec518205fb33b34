//! Pool-type dispatch.
//!
//! [`PoolTypeConcerns`] turns a pool-type tag as reported by an indexer
//! (`"Weighted"`, `"AaveLinear"`, `"Gyro3"`, ...) into the
//! [`PoolConcerns`](crate::pools::PoolConcerns) of its family. The match
//! over [`PoolType`](crate::domain::PoolType) is exhaustive, so a new family
//! cannot be added without a concern set.
//!
//! # Usage
//!
//! ```rust
//! use balancer_pool_core::config::{Network, NetworkConfig};
//! use balancer_pool_core::factory::PoolTypeConcerns;
//!
//! let network = NetworkConfig::for_network(Network::Polygon).expect("built in");
//! let concerns = PoolTypeConcerns::resolve("Investment", &network).expect("weighted alias");
//! # let _ = concerns;
//! ```

mod pool_type_concerns;

pub use pool_type_concerns::PoolTypeConcerns;
