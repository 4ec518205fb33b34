//! Fundamental domain value types used throughout the crate.
//!
//! This module contains the value types that model pools and the
//! operations on them: amounts, addresses, pool identifiers, tokens,
//! snapshots, and join/exit requests and results. Newtypes with validated
//! constructors enforce invariants at the boundary.

mod address;
mod amount;
mod basis_points;
mod decimals;
mod join_exit;
mod pool_id;
mod pool_token;
mod pool_type;
mod rounding;
mod snapshot;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::{BasisPoints, SlippageTolerance};
pub use decimals::Decimals;
pub use join_exit::{
    ExitKind, ExitPoolCall, ExitRequest, ExitResult, ExitUserData, JoinKind, JoinPoolCall,
    JoinRequest, JoinResult, JoinUserData,
};
pub use pool_id::PoolId;
pub use pool_token::PoolToken;
pub use pool_type::PoolType;
pub use rounding::Rounding;
pub use snapshot::{GyroParams, LinearParams, PoolSnapshot, MAX_AMP, MIN_AMP};
