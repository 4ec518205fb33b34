//! Vault swap transaction builder.
//!
//! [`SwapBuilder`] collects funds, deadline and slippage tolerance;
//! [`SwapBuilder::build`] turns them into a [`SwapTransaction`], the only
//! type that exposes the call target, arguments, value and limits.

use core::fmt;

use tracing::debug;

use super::limits::limits_for_swap_kind;
use super::providers::CallDataEncoder;
use super::route::{Route, SwapKind};
use crate::config::NetworkConfig;
use crate::domain::{Address, Amount, PoolId, SlippageTolerance};
use crate::error::AmmError;

/// Vault entry point used by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapFunction {
    /// `swap(SingleSwap,FundManagement,uint256,uint256)`
    Swap,
    /// `batchSwap(uint8,BatchSwapStep[],address[],FundManagement,int256[],uint256)`
    BatchSwap,
}

impl SwapFunction {
    /// Solidity function name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::BatchSwap => "batchSwap",
        }
    }

    /// Four-byte function selector.
    #[must_use]
    pub const fn selector(self) -> [u8; 4] {
        match self {
            Self::Swap => [0x52, 0xbb, 0xbe, 0x29],
            Self::BatchSwap => [0x94, 0x5b, 0xce, 0xc9],
        }
    }
}

impl fmt::Display for SwapFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{})", self.name(), hex::encode(self.selector()))
    }
}

/// Where funds come from and go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FundManagement {
    /// Account paying the token in.
    pub sender: Address,
    /// Pay from the sender's vault internal balance.
    pub from_internal_balance: bool,
    /// Account receiving the token out.
    pub recipient: Address,
    /// Credit the recipient's vault internal balance.
    pub to_internal_balance: bool,
}

impl FundManagement {
    /// External transfers from `sender` to `recipient`.
    #[must_use]
    pub const fn external(sender: Address, recipient: Address) -> Self {
        Self {
            sender,
            from_internal_balance: false,
            recipient,
            to_internal_balance: false,
        }
    }
}

/// `SingleSwap` struct of the vault's `swap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSwap {
    pub pool_id: PoolId,
    pub kind: SwapKind,
    pub asset_in: Address,
    pub asset_out: Address,
    /// The fixed amount.
    pub amount: Amount,
    pub user_data: Vec<u8>,
}

/// `BatchSwapStep` struct of the vault's `batchSwap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSwapStep {
    pub pool_id: PoolId,
    /// Index into the call's `assets`.
    pub asset_in_index: usize,
    /// Index into the call's `assets`.
    pub asset_out_index: usize,
    /// Zero chains the previous step's output.
    pub amount: Amount,
    pub user_data: Vec<u8>,
}

/// Abstract call arguments, handed to a [`CallDataEncoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapCall {
    /// Arguments of `swap`.
    Single {
        request: SingleSwap,
        funds: FundManagement,
        /// Minimum out (given in) or maximum in (given out).
        limit: Amount,
        deadline: u64,
    },
    /// Arguments of `batchSwap`.
    Batch {
        kind: SwapKind,
        swaps: Vec<BatchSwapStep>,
        assets: Vec<Address>,
        funds: FundManagement,
        limits: Vec<i128>,
        deadline: u64,
    },
}

/// Everything a submission layer needs to send a swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapAttributes {
    /// Vault address.
    pub to: Address,
    /// Entry point.
    pub function: SwapFunction,
    /// Call arguments.
    pub call: SwapCall,
    /// Native value attached to the transaction.
    pub value: Amount,
    /// Signed limit per route asset, whatever the encoding.
    pub asset_limits: Vec<i128>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Single,
    Batch,
}

/// Builder for a vault swap over a [`Route`].
///
/// A one-step route is encoded as `swap`, anything longer as `batchSwap`;
/// [`batch`](Self::batch) forces the batch form.
///
/// # Example
///
/// ```
/// use balancer_pool_core::config::{Network, NetworkConfig};
/// use balancer_pool_core::domain::{Address, Amount, PoolId, SlippageTolerance};
/// use balancer_pool_core::swaps::{Route, RouteStep, SwapBuilder, SwapFunction, SwapKind};
///
/// let (dai, usdc) = (Address::from_bytes([1; 20]), Address::from_bytes([2; 20]));
/// let route = Route::new(
///     SwapKind::GivenIn,
///     dai,
///     usdc,
///     Amount::new(1_000),
///     Amount::new(500),
///     vec![RouteStep::new(PoolId::from_bytes([7; 32]), dai, usdc, Amount::new(1_000))],
///     vec![dai, usdc],
/// )
/// .expect("valid route");
/// let network = NetworkConfig::for_network(Network::Mainnet).expect("built in");
///
/// let tx = SwapBuilder::new(route, &network)
///     .expect("one step")
///     .set_funds(dai, dai)
///     .set_deadline(1_700_000_000)
///     .set_limits(SlippageTolerance::new(100).expect("1%"))
///     .build()
///     .expect("configured");
/// assert_eq!(tx.function(), SwapFunction::Swap);
/// assert_eq!(tx.asset_limits(), &[1_000, -495]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapBuilder {
    route: Route,
    vault: Address,
    encoding: Encoding,
    funds: Option<FundManagement>,
    deadline: Option<u64>,
    tolerance: Option<SlippageTolerance>,
}

impl SwapBuilder {
    /// Starts a builder, choosing the cheapest encoding for the route.
    ///
    /// # Errors
    ///
    /// - [`AmmError::EmptyRoute`] when the route has no steps.
    /// - Any error of [`Route::validate`].
    pub fn new(route: Route, network: &NetworkConfig) -> Result<Self, AmmError> {
        route.validate()?;
        if route.is_empty() {
            return Err(AmmError::EmptyRoute);
        }
        let encoding = if route.steps().len() == 1 {
            Encoding::Single
        } else {
            Encoding::Batch
        };
        Ok(Self {
            route,
            vault: network.vault(),
            encoding,
            funds: None,
            deadline: None,
            tolerance: None,
        })
    }

    /// Starts a builder that always encodes `batchSwap`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn batch(route: Route, network: &NetworkConfig) -> Result<Self, AmmError> {
        let mut builder = Self::new(route, network)?;
        builder.encoding = Encoding::Batch;
        Ok(builder)
    }

    /// Sets sender and recipient; internal balances are not used.
    #[must_use]
    pub fn set_funds(mut self, sender: Address, recipient: Address) -> Self {
        self.funds = Some(FundManagement::external(sender, recipient));
        self
    }

    /// Sets the deadline, in unix seconds. It is only encoded, not enforced.
    #[must_use]
    pub fn set_deadline(mut self, deadline: u64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the slippage tolerance applied to the non-fixed side.
    #[must_use]
    pub fn set_limits(mut self, tolerance: SlippageTolerance) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Returns the route being built.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Finalizes the transaction.
    ///
    /// # Errors
    ///
    /// - [`AmmError::BuilderNotConfigured`] naming the first missing field
    ///   (`funds`, `deadline` or `limits`).
    /// - [`AmmError::Overflow`] if an amount leaves the `i128` range.
    pub fn build(self) -> Result<SwapTransaction, AmmError> {
        let funds = self.funds.ok_or(AmmError::BuilderNotConfigured("funds"))?;
        let deadline = self.deadline.ok_or(AmmError::BuilderNotConfigured("deadline"))?;
        let tolerance = self.tolerance.ok_or(AmmError::BuilderNotConfigured("limits"))?;

        let route = &self.route;
        let deltas = route.deltas()?;
        let asset_limits = limits_for_swap_kind(
            route.kind(),
            route.token_in(),
            route.token_out(),
            &deltas,
            route.assets(),
            tolerance,
        )?;
        let in_limit = limit_at(&asset_limits, route.asset_index(route.token_in())?)?;
        let out_limit = limit_at(&asset_limits, route.asset_index(route.token_out())?)?;

        let value = if route.token_in().is_native() {
            Amount::new(
                u128::try_from(in_limit).map_err(|_| AmmError::Underflow("negative native limit"))?,
            )
        } else {
            Amount::ZERO
        };

        let (function, call) = match self.encoding {
            Encoding::Single => {
                let Some(step) = route.steps().first() else {
                    return Err(AmmError::EmptyRoute);
                };
                let limit = match route.kind() {
                    SwapKind::GivenIn => out_limit.unsigned_abs(),
                    SwapKind::GivenOut => in_limit.unsigned_abs(),
                };
                let call = SwapCall::Single {
                    request: SingleSwap {
                        pool_id: step.pool_id,
                        kind: route.kind(),
                        asset_in: step.token_in,
                        asset_out: step.token_out,
                        amount: step.amount,
                        user_data: step.user_data.clone(),
                    },
                    funds,
                    limit: Amount::new(limit),
                    deadline,
                };
                (SwapFunction::Swap, call)
            }
            Encoding::Batch => {
                let swaps = route
                    .steps()
                    .iter()
                    .map(|step| {
                        Ok(BatchSwapStep {
                            pool_id: step.pool_id,
                            asset_in_index: route.asset_index(step.token_in)?,
                            asset_out_index: route.asset_index(step.token_out)?,
                            amount: step.amount,
                            user_data: step.user_data.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, AmmError>>()?;
                let call = SwapCall::Batch {
                    kind: route.kind(),
                    swaps,
                    assets: route.assets().to_vec(),
                    funds,
                    limits: asset_limits.clone(),
                    deadline,
                };
                (SwapFunction::BatchSwap, call)
            }
        };

        debug!(
            function = function.name(),
            kind = %route.kind(),
            steps = route.steps().len(),
            tolerance_bps = tolerance.bps(),
            %value,
            "built swap transaction"
        );

        Ok(SwapTransaction {
            attributes: SwapAttributes {
                to: self.vault,
                function,
                call,
                value,
                asset_limits,
            },
            deltas,
        })
    }
}

fn limit_at(limits: &[i128], index: usize) -> Result<i128, AmmError> {
    limits
        .get(index)
        .copied()
        .ok_or(AmmError::InvalidToken("token not in route assets"))
}

/// A fully configured vault swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTransaction {
    attributes: SwapAttributes,
    deltas: Vec<i128>,
}

impl SwapTransaction {
    /// Vault address.
    #[must_use]
    pub const fn to(&self) -> Address {
        self.attributes.to
    }

    /// Entry point.
    #[must_use]
    pub const fn function(&self) -> SwapFunction {
        self.attributes.function
    }

    /// Full attributes.
    #[must_use]
    pub const fn attributes(&self) -> &SwapAttributes {
        &self.attributes
    }

    /// Consumes the transaction, returning its attributes.
    #[must_use]
    pub fn into_attributes(self) -> SwapAttributes {
        self.attributes
    }

    /// Encodes the call with `encoder`.
    ///
    /// # Errors
    ///
    /// Whatever the encoder reports.
    pub fn data<E: CallDataEncoder>(&self, encoder: &E) -> Result<Vec<u8>, E::Error> {
        encoder.encode(self.attributes.function, &self.attributes.call)
    }

    /// Native value: the bounded amount in when the caller pays the native
    /// asset, zero otherwise.
    #[must_use]
    pub const fn value(&self) -> Amount {
        self.attributes.value
    }

    /// Signed limit per route asset.
    #[must_use]
    pub fn asset_limits(&self) -> &[i128] {
        &self.attributes.asset_limits
    }

    /// Expected net delta per route asset.
    #[must_use]
    pub fn deltas(&self) -> &[i128] {
        &self.deltas
    }
}
