//! Per-network swap entry point.

use tracing::debug;

use super::builder::{SwapAttributes, SwapBuilder, SwapFunction, SwapTransaction};
use super::flash_swap::SimpleFlashSwap;
use super::join_exit::{can_use_join_exit, some_join_exit};
use super::limits::get_limits_for_slippage;
use super::providers::{CallDataEncoder, RouteBuildError, RouteProvider, RouteRequest};
use super::route::{Route, SwapKind};
use crate::config::{NetworkConfig, SwapOptions};
use crate::domain::{Address, Amount, PoolSnapshot, SlippageTolerance};
use crate::error::AmmError;

/// Parameters of [`Swaps::build_swap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSwapParams {
    pub sender: Address,
    pub recipient: Address,
    pub route: Route,
    /// Unix seconds.
    pub deadline: u64,
    pub max_slippage: SlippageTolerance,
}

/// Swap entry point bound to one network.
///
/// Route finding is delegated to a [`RouteProvider`]; everything else is
/// local computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swaps {
    network: NetworkConfig,
    options: SwapOptions,
}

impl Swaps {
    /// Facade with default [`SwapOptions`].
    #[must_use]
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            options: SwapOptions::default(),
        }
    }

    /// Replaces the options used when a caller leaves them unset.
    #[must_use]
    pub const fn with_options(mut self, options: SwapOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the network configuration.
    #[must_use]
    pub const fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Returns the default options.
    #[must_use]
    pub const fn options(&self) -> &SwapOptions {
        &self.options
    }

    /// Builds a vault swap, single form for one-step routes.
    ///
    /// # Errors
    ///
    /// Any error of [`SwapBuilder::new`] or [`SwapBuilder::build`].
    pub fn build_swap(&self, params: BuildSwapParams) -> Result<SwapTransaction, AmmError> {
        SwapBuilder::new(params.route, &self.network)?
            .set_funds(params.sender, params.recipient)
            .set_deadline(params.deadline)
            .set_limits(params.max_slippage)
            .build()
    }

    /// Like [`build_swap`](Self::build_swap), refusing routes that join or
    /// exit one of `pools`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::JoinExitPathUnsupported`] for join/exit routes.
    /// - Any error of [`build_swap`](Self::build_swap).
    pub fn build_vault_swap(
        &self,
        params: BuildSwapParams,
        pools: &[PoolSnapshot],
    ) -> Result<SwapTransaction, AmmError> {
        if some_join_exit(pools, &params.route) {
            return Err(AmmError::JoinExitPathUnsupported(
                "route joins or exits a weighted pool and needs a relayer",
            ));
        }
        self.build_swap(params)
    }

    /// Asks `provider` for a given-in route.
    ///
    /// # Errors
    ///
    /// Whatever the provider reports.
    pub fn find_route_given_in<P: RouteProvider>(
        &self,
        provider: &P,
        token_in: Address,
        token_out: Address,
        amount: Amount,
    ) -> Result<Route, P::Error> {
        provider.find_route(&self.route_request(SwapKind::GivenIn, token_in, token_out, amount))
    }

    /// Asks `provider` for a given-out route.
    ///
    /// # Errors
    ///
    /// Whatever the provider reports.
    pub fn find_route_given_out<P: RouteProvider>(
        &self,
        provider: &P,
        token_in: Address,
        token_out: Address,
        amount: Amount,
    ) -> Result<Route, P::Error> {
        provider.find_route(&self.route_request(SwapKind::GivenOut, token_in, token_out, amount))
    }

    /// Finds a given-in route and builds its transaction with the default
    /// deadline and slippage.
    ///
    /// # Errors
    ///
    /// - [`RouteBuildError::Provider`] when the router fails.
    /// - [`AmmError::EmptyRoute`] when it finds nothing.
    /// - Any error of [`build_swap`](Self::build_swap).
    pub fn build_route_exact_in<P: RouteProvider>(
        &self,
        provider: &P,
        sender: Address,
        recipient: Address,
        token_in: Address,
        token_out: Address,
        amount: Amount,
    ) -> Result<SwapTransaction, RouteBuildError<P::Error>> {
        let route = self
            .find_route_given_in(provider, token_in, token_out, amount)
            .map_err(RouteBuildError::Provider)?;
        debug!(
            steps = route.steps().len(),
            return_amount = %route.return_amount(),
            "router returned route"
        );
        Ok(self.build_swap(BuildSwapParams {
            sender,
            recipient,
            route,
            deadline: self.options.deadline(),
            max_slippage: self.options.max_slippage(),
        })?)
    }

    /// Signed limits for arbitrary token sets; see
    /// [`get_limits_for_slippage`].
    ///
    /// # Errors
    ///
    /// Same as [`get_limits_for_slippage`].
    pub fn get_limits_for_slippage(
        tokens_in: &[Address],
        tokens_out: &[Address],
        kind: SwapKind,
        deltas: &[i128],
        assets: &[Address],
        tolerance: SlippageTolerance,
    ) -> Result<Vec<i128>, AmmError> {
        get_limits_for_slippage(tokens_in, tokens_out, kind, deltas, assets, tolerance)
    }

    /// Pairs each delta with its asset.
    #[must_use]
    pub fn asset_deltas(deltas: &[i128], assets: &[Address]) -> Vec<(Address, i128)> {
        assets.iter().copied().zip(deltas.iter().copied()).collect()
    }

    /// Checks quoted deltas against limits: every delta must be at most
    /// its limit (pay no more, receive no less).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] on a length mismatch.
    /// - [`AmmError::SlippageExceeded`] naming the first offending asset.
    pub fn check_limits(deltas: &[i128], limits: &[i128]) -> Result<(), AmmError> {
        if deltas.len() != limits.len() {
            return Err(AmmError::InvalidConfiguration("one limit per delta expected"));
        }
        match deltas.iter().zip(limits).position(|(delta, limit)| delta > limit) {
            Some(index) => Err(AmmError::SlippageExceeded { index }),
            None => Ok(()),
        }
    }

    /// Attributes of `flash` against this network's vault.
    #[must_use]
    pub fn build_simple_flash_swap(&self, flash: &SimpleFlashSwap) -> SwapAttributes {
        flash.attributes(&self.network)
    }

    /// Call data of `flash` as a `batchSwap`.
    ///
    /// # Errors
    ///
    /// Whatever the encoder reports.
    pub fn encode_simple_flash_swap<E: CallDataEncoder>(
        flash: &SimpleFlashSwap,
        encoder: &E,
    ) -> Result<Vec<u8>, E::Error> {
        encoder.encode(SwapFunction::BatchSwap, &flash.to_call())
    }

    /// See [`can_use_join_exit`].
    #[must_use]
    pub fn can_use_join_exit(kind: SwapKind, token_in: Address, token_out: Address) -> bool {
        can_use_join_exit(kind, token_in, token_out)
    }

    /// See [`some_join_exit`].
    #[must_use]
    pub fn some_join_exit(pools: &[PoolSnapshot], route: &Route) -> bool {
        some_join_exit(pools, route)
    }

    fn route_request(
        &self,
        kind: SwapKind,
        token_in: Address,
        token_out: Address,
        amount: Amount,
    ) -> RouteRequest {
        RouteRequest {
            token_in,
            token_out,
            kind,
            amount,
            gas_price: self.options.gas_price(),
            max_pools: self.options.max_pools(),
            use_join_exit_paths: can_use_join_exit(kind, token_in, token_out),
        }
    }
}
