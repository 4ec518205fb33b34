//! Join and exit requests, their results, and the abstract vault calls.

use super::{Address, Amount, PoolId, SlippageTolerance};
use crate::error::AmmError;
use crate::math::FixedPoint;

/// How a join is specified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// Deposit exact token amounts; BPT out is computed.
    ExactTokensIn {
        /// One amount per non-BPT pool token, in pool order.
        amounts_in: Vec<Amount>,
    },
    /// Mint an exact amount of BPT by depositing every token proportionally.
    Proportional {
        /// BPT to mint.
        bpt_out: Amount,
    },
}

impl JoinKind {
    /// Creates an `ExactTokensIn` join.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if every amount is zero.
    pub fn exact_tokens_in(amounts_in: Vec<Amount>) -> Result<Self, AmmError> {
        if amounts_in.iter().all(Amount::is_zero) {
            return Err(AmmError::InvalidAmount(
                "at least one amount in must be positive",
            ));
        }
        Ok(Self::ExactTokensIn { amounts_in })
    }

    /// Creates a `Proportional` join.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if `bpt_out` is zero.
    pub const fn proportional(bpt_out: Amount) -> Result<Self, AmmError> {
        if bpt_out.is_zero() {
            return Err(AmmError::InvalidAmount("bpt out must be positive"));
        }
        Ok(Self::Proportional { bpt_out })
    }
}

/// How an exit is specified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExitKind {
    /// Burn an exact amount of BPT for every token proportionally.
    Proportional {
        /// BPT to burn.
        bpt_in: Amount,
    },
    /// Withdraw exact token amounts; BPT in is computed.
    ExactTokensOut {
        /// One amount per non-BPT pool token, in pool order.
        amounts_out: Vec<Amount>,
    },
    /// Burn an exact amount of BPT for a single token.
    SingleToken {
        /// BPT to burn.
        bpt_in: Amount,
        /// Token to receive.
        token: Address,
    },
}

impl ExitKind {
    /// Creates a `Proportional` exit.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if `bpt_in` is zero.
    pub const fn proportional(bpt_in: Amount) -> Result<Self, AmmError> {
        if bpt_in.is_zero() {
            return Err(AmmError::InvalidAmount("bpt in must be positive"));
        }
        Ok(Self::Proportional { bpt_in })
    }

    /// Creates an `ExactTokensOut` exit.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if every amount is zero.
    pub fn exact_tokens_out(amounts_out: Vec<Amount>) -> Result<Self, AmmError> {
        if amounts_out.iter().all(Amount::is_zero) {
            return Err(AmmError::InvalidAmount(
                "at least one amount out must be positive",
            ));
        }
        Ok(Self::ExactTokensOut { amounts_out })
    }

    /// Creates a `SingleToken` exit.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if `bpt_in` is zero.
    pub const fn single_token(bpt_in: Amount, token: Address) -> Result<Self, AmmError> {
        if bpt_in.is_zero() {
            return Err(AmmError::InvalidAmount("bpt in must be positive"));
        }
        Ok(Self::SingleToken { bpt_in, token })
    }
}

/// A request to add liquidity.
///
/// `tokens_in` lists the assets the caller supplies, one per non-BPT pool
/// token in pool order. The zero address may stand in for the wrapped
/// native token; the join then carries a native `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    sender: Address,
    recipient: Address,
    tokens_in: Vec<Address>,
    kind: JoinKind,
    slippage: SlippageTolerance,
}

impl JoinRequest {
    /// Creates a join request.
    #[must_use]
    pub const fn new(
        sender: Address,
        recipient: Address,
        tokens_in: Vec<Address>,
        kind: JoinKind,
        slippage: SlippageTolerance,
    ) -> Self {
        Self {
            sender,
            recipient,
            tokens_in,
            kind,
            slippage,
        }
    }

    /// Account providing the tokens.
    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Account receiving the BPT.
    #[must_use]
    pub const fn recipient(&self) -> Address {
        self.recipient
    }

    /// Assets supplied, in pool order.
    #[must_use]
    pub fn tokens_in(&self) -> &[Address] {
        &self.tokens_in
    }

    /// The join kind.
    #[must_use]
    pub const fn kind(&self) -> &JoinKind {
        &self.kind
    }

    /// Slippage tolerance for the bounds.
    #[must_use]
    pub const fn slippage(&self) -> SlippageTolerance {
        self.slippage
    }
}

/// A request to remove liquidity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitRequest {
    sender: Address,
    recipient: Address,
    kind: ExitKind,
    slippage: SlippageTolerance,
    to_native: bool,
}

impl ExitRequest {
    /// Creates an exit request paying out wrapped tokens.
    #[must_use]
    pub const fn new(
        sender: Address,
        recipient: Address,
        kind: ExitKind,
        slippage: SlippageTolerance,
    ) -> Self {
        Self {
            sender,
            recipient,
            kind,
            slippage,
            to_native: false,
        }
    }

    /// Pays out the native asset instead of the wrapped native token.
    #[must_use]
    pub fn into_native(mut self) -> Self {
        self.to_native = true;
        self
    }

    /// Account burning the BPT.
    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Account receiving the tokens.
    #[must_use]
    pub const fn recipient(&self) -> Address {
        self.recipient
    }

    /// The exit kind.
    #[must_use]
    pub const fn kind(&self) -> &ExitKind {
        &self.kind
    }

    /// Slippage tolerance for the bounds.
    #[must_use]
    pub const fn slippage(&self) -> SlippageTolerance {
        self.slippage
    }

    /// Whether the wrapped native token is paid out as the native asset.
    #[must_use]
    pub const fn to_native(&self) -> bool {
        self.to_native
    }
}

/// Join user data, mirroring the pool contracts' join kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinUserData {
    /// `EXACT_TOKENS_IN_FOR_BPT_OUT`
    ExactTokensInForBptOut {
        /// Amounts in, excluding the pool's own BPT.
        amounts_in: Vec<Amount>,
        /// Minimum BPT accepted.
        min_bpt_out: Amount,
    },
    /// `ALL_TOKENS_IN_FOR_EXACT_BPT_OUT`
    AllTokensInForExactBptOut {
        /// BPT to mint.
        bpt_out: Amount,
    },
}

/// Exit user data, mirroring the pool contracts' exit kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExitUserData {
    /// `EXACT_BPT_IN_FOR_ONE_TOKEN_OUT`
    ExactBptInForOneTokenOut {
        /// BPT burned.
        bpt_in: Amount,
        /// Index of the token paid out, excluding the pool's own BPT.
        exit_token_index: usize,
    },
    /// `EXACT_BPT_IN_FOR_TOKENS_OUT`
    ExactBptInForTokensOut {
        /// BPT burned.
        bpt_in: Amount,
    },
    /// `BPT_IN_FOR_EXACT_TOKENS_OUT`
    BptInForExactTokensOut {
        /// Amounts out, excluding the pool's own BPT.
        amounts_out: Vec<Amount>,
        /// Maximum BPT burned.
        max_bpt_in: Amount,
    },
}

/// Abstract `joinPool` call arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPoolCall {
    /// Pool joined.
    pub pool_id: PoolId,
    /// Account providing the tokens.
    pub sender: Address,
    /// Account receiving the BPT.
    pub recipient: Address,
    /// Every pool asset, in pool order, the pool's own BPT included.
    pub assets: Vec<Address>,
    /// Upper bound per asset; zero for the pool's own BPT.
    pub max_amounts_in: Vec<Amount>,
    /// Pool-specific join data.
    pub user_data: JoinUserData,
    /// Always `false`.
    pub from_internal_balance: bool,
}

/// Abstract `exitPool` call arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitPoolCall {
    /// Pool exited.
    pub pool_id: PoolId,
    /// Account burning the BPT.
    pub sender: Address,
    /// Account receiving the tokens.
    pub recipient: Address,
    /// Every pool asset, in pool order, the pool's own BPT included.
    pub assets: Vec<Address>,
    /// Lower bound per asset; zero for the pool's own BPT.
    pub min_amounts_out: Vec<Amount>,
    /// Pool-specific exit data.
    pub user_data: ExitUserData,
    /// Always `false`.
    pub to_internal_balance: bool,
}

/// Outcome of a join computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinResult {
    to: Address,
    call: JoinPoolCall,
    value: Amount,
    expected_bpt_out: Amount,
    min_bpt_out: Amount,
    expected_amounts_in: Vec<Amount>,
    price_impact: FixedPoint,
}

impl JoinResult {
    /// Assembles a join result.
    #[must_use]
    pub const fn new(
        to: Address,
        call: JoinPoolCall,
        value: Amount,
        expected_bpt_out: Amount,
        min_bpt_out: Amount,
        expected_amounts_in: Vec<Amount>,
        price_impact: FixedPoint,
    ) -> Self {
        Self {
            to,
            call,
            value,
            expected_bpt_out,
            min_bpt_out,
            expected_amounts_in,
            price_impact,
        }
    }

    /// Call target (the vault).
    #[must_use]
    pub const fn to(&self) -> Address {
        self.to
    }

    /// The `joinPool` arguments.
    #[must_use]
    pub const fn call(&self) -> &JoinPoolCall {
        &self.call
    }

    /// Native value to attach.
    pub const fn value(&self) -> Amount {
        self.value
    }

    /// BPT the join is expected to mint.
    pub const fn expected_bpt_out(&self) -> Amount {
        self.expected_bpt_out
    }

    /// BPT the join is guaranteed to mint.
    pub const fn min_bpt_out(&self) -> Amount {
        self.min_bpt_out
    }

    /// Expected amounts in, excluding the pool's own BPT.
    #[must_use]
    pub fn expected_amounts_in(&self) -> &[Amount] {
        &self.expected_amounts_in
    }

    /// Bounded amounts in, excluding the pool's own BPT.
    #[must_use]
    pub fn max_amounts_in(&self) -> Vec<Amount> {
        self.call
            .assets
            .iter()
            .zip(&self.call.max_amounts_in)
            .filter(|(asset, _)| **asset != self.call.pool_id.address())
            .map(|(_, amount)| *amount)
            .collect()
    }

    /// Price impact of the join, in `[0, 1]`.
    pub const fn price_impact(&self) -> FixedPoint {
        self.price_impact
    }
}

/// Outcome of an exit computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitResult {
    to: Address,
    call: ExitPoolCall,
    expected_bpt_in: Amount,
    max_bpt_in: Amount,
    expected_amounts_out: Vec<Amount>,
    price_impact: FixedPoint,
}

impl ExitResult {
    /// Assembles an exit result.
    #[must_use]
    pub const fn new(
        to: Address,
        call: ExitPoolCall,
        expected_bpt_in: Amount,
        max_bpt_in: Amount,
        expected_amounts_out: Vec<Amount>,
        price_impact: FixedPoint,
    ) -> Self {
        Self {
            to,
            call,
            expected_bpt_in,
            max_bpt_in,
            expected_amounts_out,
            price_impact,
        }
    }

    /// Call target (the vault).
    #[must_use]
    pub const fn to(&self) -> Address {
        self.to
    }

    /// The `exitPool` arguments.
    #[must_use]
    pub const fn call(&self) -> &ExitPoolCall {
        &self.call
    }

    /// BPT the exit is expected to burn.
    pub const fn expected_bpt_in(&self) -> Amount {
        self.expected_bpt_in
    }

    /// BPT the exit may burn at most.
    pub const fn max_bpt_in(&self) -> Amount {
        self.max_bpt_in
    }

    /// Expected amounts out, excluding the pool's own BPT.
    #[must_use]
    pub fn expected_amounts_out(&self) -> &[Amount] {
        &self.expected_amounts_out
    }

    /// Guaranteed amounts out, excluding the pool's own BPT.
    #[must_use]
    pub fn min_amounts_out(&self) -> Vec<Amount> {
        self.call
            .assets
            .iter()
            .zip(&self.call.min_amounts_out)
            .filter(|(asset, _)| **asset != self.call.pool_id.address())
            .map(|(_, amount)| *amount)
            .collect()
    }

    /// Price impact of the exit, in `[0, 1]`.
    pub const fn price_impact(&self) -> FixedPoint {
        self.price_impact
    }
}
