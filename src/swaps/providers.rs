//! Interfaces to the collaborators this crate does not implement: pool
//! discovery, route finding and ABI encoding.
//!
//! All three are synchronous and caller supplied. Each carries its own
//! error type so that transport failures never masquerade as
//! [`AmmError`]s.

use thiserror::Error;

use super::builder::{SwapCall, SwapFunction};
use super::route::{Route, SwapKind};
use crate::domain::{Address, Amount, PoolId, PoolSnapshot};
use crate::error::AmmError;

/// Source of pool snapshots, typically an indexer or node client.
pub trait PoolSnapshotProvider {
    /// Transport or decoding failure.
    type Error;

    /// Every pool known to the provider.
    ///
    /// # Errors
    ///
    /// Provider specific.
    fn pools(&self) -> Result<Vec<PoolSnapshot>, Self::Error>;

    /// One pool by id, `None` when unknown.
    ///
    /// # Errors
    ///
    /// Provider specific.
    fn pool(&self, id: PoolId) -> Result<Option<PoolSnapshot>, Self::Error> {
        Ok(self.pools()?.into_iter().find(|p| p.id() == id))
    }
}

/// Query sent to a [`RouteProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequest {
    pub token_in: Address,
    pub token_out: Address,
    pub kind: SwapKind,
    /// Amount of the fixed side.
    pub amount: Amount,
    pub gas_price: Amount,
    /// Upper bound on pools touched by the route.
    pub max_pools: usize,
    /// Whether the router may join or exit pools along the path.
    pub use_join_exit_paths: bool,
}

/// External smart order router. The crate trusts the route to be optimal
/// and only validates its shape.
pub trait RouteProvider {
    /// Transport or routing failure.
    type Error;

    /// Finds a route for `request`. An empty route means "no swap".
    ///
    /// # Errors
    ///
    /// Provider specific.
    fn find_route(&self, request: &RouteRequest) -> Result<Route, Self::Error>;
}

/// Turns abstract call arguments into ABI call data.
pub trait CallDataEncoder {
    /// Encoding failure.
    type Error;

    /// Encodes `call` for `function`, selector included.
    ///
    /// # Errors
    ///
    /// Encoder specific.
    fn encode(&self, function: SwapFunction, call: &SwapCall) -> Result<Vec<u8>, Self::Error>;
}

/// Failure of an operation that consults a [`RouteProvider`].
#[derive(Debug, Error)]
pub enum RouteBuildError<E> {
    /// The router failed.
    #[error("route provider failed: {0}")]
    Provider(E),
    /// The route could not be turned into a transaction.
    #[error(transparent)]
    Amm(#[from] AmmError),
}
