//! Network addressing and swap defaults.
//!
//! [`NetworkConfig`] carries the per-chain addresses the pool concerns and
//! the swap builder need (vault, wrapped native token, optional relayer).
//! [`SwapOptions`] holds the defaults applied when a caller leaves route or
//! transaction parameters unset.

mod network;
mod swap_options;

pub use network::{Network, NetworkConfig, VAULT_ADDRESS};
pub use swap_options::{
    SwapOptions, DEFAULT_DEADLINE, DEFAULT_MAX_POOLS, DEFAULT_MAX_SLIPPAGE_BPS,
};
