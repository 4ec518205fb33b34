//! Join/exit plumbing shared by every pool family.
//!
//! Families only supply the invariant math through [`BptMath`]; everything
//! around it lives here: upscaling balances, dropping the pool's own BPT,
//! mapping the native asset onto the wrapped native token, applying slippage
//! and assembling the vault calls.

use tracing::{debug, warn};

use crate::config::NetworkConfig;
use crate::domain::{
    Address, Amount, ExitKind, ExitPoolCall, ExitRequest, ExitResult, ExitUserData, JoinKind,
    JoinPoolCall, JoinRequest, JoinResult, JoinUserData, PoolSnapshot, PoolToken, Rounding,
    SlippageTolerance,
};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};

/// Upscaled view of a snapshot, without the pool's own BPT.
///
/// Index `i` here is the `i`-th non-BPT token, which is also the index used
/// by request amounts and by the user data of the vault calls.
#[derive(Debug, Clone)]
pub(crate) struct ScaledPool<'a> {
    snapshot: &'a PoolSnapshot,
    positions: Vec<usize>,
    balances: Vec<FixedPoint>,
    supply: FixedPoint,
}

impl<'a> ScaledPool<'a> {
    pub(crate) fn new(snapshot: &'a PoolSnapshot) -> Result<Self, AmmError> {
        let bpt = if snapshot.kind()?.holds_own_bpt() {
            snapshot.bpt_index()
        } else {
            None
        };
        let mut positions = Vec::with_capacity(snapshot.tokens().len());
        let mut balances = Vec::with_capacity(snapshot.tokens().len());
        for (position, token) in snapshot.tokens().iter().enumerate() {
            if Some(position) == bpt {
                continue;
            }
            positions.push(position);
            balances.push(token.scaled_balance()?);
        }
        Ok(Self {
            snapshot,
            positions,
            balances,
            supply: bpt_value(snapshot.total_shares()),
        })
    }

    pub(crate) const fn snapshot(&self) -> &'a PoolSnapshot {
        self.snapshot
    }

    pub(crate) fn len(&self) -> usize {
        self.balances.len()
    }

    pub(crate) fn balances(&self) -> &[FixedPoint] {
        &self.balances
    }

    pub(crate) fn balance(&self, index: usize) -> Result<FixedPoint, AmmError> {
        self.balances
            .get(index)
            .copied()
            .ok_or(AmmError::InvalidToken("token index out of range"))
    }

    pub(crate) const fn supply(&self) -> FixedPoint {
        self.supply
    }

    pub(crate) const fn fee(&self) -> FixedPoint {
        self.snapshot.swap_fee()
    }

    pub(crate) fn token(&self, index: usize) -> Result<&'a PoolToken, AmmError> {
        let snapshot = self.snapshot;
        self.positions
            .get(index)
            .and_then(|&p| snapshot.tokens().get(p))
            .ok_or(AmmError::InvalidToken("token index out of range"))
    }

    /// Index of `token` among the non-BPT tokens.
    pub(crate) fn index_of(&self, token: Address) -> Option<usize> {
        let position = self.snapshot.token_index(token)?;
        self.positions.iter().position(|&p| p == position)
    }

    /// Index of the non-BPT token that sits at `position` in the snapshot.
    pub(crate) fn index_of_position(&self, position: usize) -> Option<usize> {
        self.positions.iter().position(|&p| p == position)
    }

    pub(crate) fn require_supply(&self) -> Result<(), AmmError> {
        if self.supply.is_zero() {
            return Err(AmmError::InsufficientLiquidity);
        }
        Ok(())
    }

    pub(crate) fn upscale(&self, amounts: &[Amount]) -> Result<Vec<FixedPoint>, AmmError> {
        if amounts.len() != self.len() {
            return Err(AmmError::InvalidConfiguration(
                "amounts must match the pool's token count",
            ));
        }
        amounts
            .iter()
            .enumerate()
            .map(|(i, a)| self.token(i)?.upscale(*a))
            .collect()
    }

    pub(crate) fn downscale(
        &self,
        index: usize,
        value: FixedPoint,
        rounding: Rounding,
    ) -> Result<Amount, AmmError> {
        self.token(index)?.downscale(value, rounding)
    }

    /// Normalized weights, in non-BPT order.
    pub(crate) fn weights(&self) -> Result<Vec<FixedPoint>, AmmError> {
        (0..self.len())
            .map(|i| {
                self.token(i)?
                    .weight()
                    .ok_or(AmmError::InvalidWeight("weighted pool token without weight"))
            })
            .collect()
    }

    /// Converts a price between upscaled units into a price between whole
    /// tokens: `scaled · rate_out / rate_in`.
    pub(crate) fn unscale_price(
        &self,
        index_in: usize,
        index_out: usize,
        scaled: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        let rate_in = self.token(index_in)?.price_rate();
        let rate_out = self.token(index_out)?.price_rate();
        scaled.mul_up(rate_out)?.div_up(rate_in)
    }

    /// Resolves a spot-price token pair to distinct non-BPT indices.
    pub(crate) fn pair(&self, token_in: Address, token_out: Address) -> Result<(usize, usize), AmmError> {
        let index_in = self
            .index_of(token_in)
            .ok_or(AmmError::InvalidToken("token in is not in the pool"))?;
        let index_out = self
            .index_of(token_out)
            .ok_or(AmmError::InvalidToken("token out is not in the pool"))?;
        if index_in == index_out {
            return Err(AmmError::InvalidToken("token in and token out are the same"));
        }
        Ok((index_in, index_out))
    }
}

/// BPT carries 18 decimals and no rate; raw units are already upscaled.
pub(crate) const fn bpt_value(amount: Amount) -> FixedPoint {
    FixedPoint::from_raw_u128(amount.get())
}

pub(crate) fn bpt_amount(value: FixedPoint) -> Result<Amount, AmmError> {
    value.raw_u128().map(Amount::new)
}

/// Invariant math a family plugs into the shared join/exit flow.
///
/// Every amount is upscaled and excludes the pool's own BPT.
pub(crate) trait BptMath {
    /// BPT minted for depositing `amounts_in`.
    fn bpt_out_given_exact_tokens_in(
        &self,
        pool: &ScaledPool<'_>,
        amounts_in: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError>;

    /// BPT worth `amounts` at current marginal prices.
    fn bpt_zero_price_impact(
        &self,
        pool: &ScaledPool<'_>,
        amounts: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError>;

    /// BPT burned for withdrawing `amounts_out`.
    fn bpt_in_given_exact_tokens_out(
        &self,
        _pool: &ScaledPool<'_>,
        _amounts_out: &[FixedPoint],
    ) -> Result<FixedPoint, AmmError> {
        Err(AmmError::UnsupportedOperation(
            "exact-tokens-out exits are not supported by this pool type",
        ))
    }

    /// Amount of token `index` paid out for burning `bpt_in`.
    fn token_out_given_exact_bpt_in(
        &self,
        _pool: &ScaledPool<'_>,
        _index: usize,
        _bpt_in: FixedPoint,
    ) -> Result<FixedPoint, AmmError> {
        Err(AmmError::UnsupportedOperation(
            "single-token exits are not supported by this pool type",
        ))
    }

    /// Pools that only accept proportional joins settle exact-tokens-in
    /// requests as a proportional join of the minted BPT.
    fn proportional_only(&self) -> bool {
        false
    }
}

/// BPT minted against the smallest `amount_i / balance_i` ratio.
pub(crate) fn bpt_out_at_min_ratio(
    pool: &ScaledPool<'_>,
    amounts_in: &[FixedPoint],
) -> Result<FixedPoint, AmmError> {
    let mut ratio: Option<FixedPoint> = None;
    for (amount, balance) in amounts_in.iter().zip(pool.balances()) {
        let r = amount.div_down(*balance)?;
        ratio = Some(ratio.map_or(r, |current| current.min(r)));
    }
    let ratio = ratio.ok_or(AmmError::InvalidConfiguration("pool has no tokens"))?;
    pool.supply().mul_down(ratio)
}

/// Clamps `1 − bpt/zero` (joins) or `bpt/zero − 1` (exits) into `[0, 1]`.
pub(crate) fn clamp_price_impact(
    bpt: FixedPoint,
    bpt_zero_impact: FixedPoint,
    is_join: bool,
) -> Result<FixedPoint, AmmError> {
    if bpt_zero_impact.is_zero() {
        return Ok(if is_join || bpt.is_zero() {
            FixedPoint::ZERO
        } else {
            FixedPoint::ONE
        });
    }
    let ratio = bpt.div_down(bpt_zero_impact)?;
    let raw = if is_join {
        FixedPoint::ONE.safe_sub(&ratio)
    } else {
        ratio.safe_sub(&FixedPoint::ONE)
    };
    match raw {
        Err(_) => {
            debug!(%ratio, is_join, "negative price impact clamped to zero");
            Ok(FixedPoint::ZERO)
        }
        Ok(impact) if impact > FixedPoint::ONE => {
            warn!(%impact, is_join, "price impact clamped to one");
            Ok(FixedPoint::ONE)
        }
        Ok(impact) => Ok(impact),
    }
}

pub(crate) fn price_impact_with<M: BptMath + ?Sized>(
    math: &M,
    snapshot: &PoolSnapshot,
    amounts: &[Amount],
    bpt_amount: Amount,
    is_join: bool,
) -> Result<FixedPoint, AmmError> {
    let pool = ScaledPool::new(snapshot)?;
    pool.require_supply()?;
    let scaled = pool.upscale(amounts)?;
    let zero = math.bpt_zero_price_impact(&pool, &scaled)?;
    clamp_price_impact(bpt_value(bpt_amount), zero, is_join)
}

/// Checks the supplied tokens against the pool and builds the full asset
/// list. Returns the assets and the non-BPT index paid in native value.
fn join_assets(
    pool: &ScaledPool<'_>,
    tokens_in: &[Address],
    network: Option<&NetworkConfig>,
) -> Result<(Vec<Address>, Option<usize>), AmmError> {
    if tokens_in.len() != pool.len() {
        return Err(AmmError::InvalidConfiguration(
            "tokens in must match the pool's token count",
        ));
    }
    let mut native = None;
    for (i, supplied) in tokens_in.iter().enumerate() {
        let expected = pool.token(i)?.address();
        if *supplied == expected {
            continue;
        }
        if !supplied.is_native() {
            return Err(AmmError::InvalidToken(
                "token does not match the pool's token order",
            ));
        }
        let network = network.ok_or(AmmError::InvalidToken(
            "native asset needs a network configuration",
        ))?;
        if network.wrapped_native_asset() != expected {
            return Err(AmmError::InvalidToken(
                "native asset used in place of a non-native token",
            ));
        }
        native = Some(i);
    }
    let assets = full_assets(pool, |i| tokens_in.get(i).copied())?;
    Ok((assets, native))
}

fn exit_assets(
    pool: &ScaledPool<'_>,
    to_native: bool,
    network: Option<&NetworkConfig>,
) -> Result<Vec<Address>, AmmError> {
    let wrapped = if to_native {
        let network = network.ok_or(AmmError::InvalidToken(
            "native asset needs a network configuration",
        ))?;
        let wrapped = network.wrapped_native_asset();
        if pool.index_of(wrapped).is_none() {
            return Err(AmmError::InvalidToken(
                "pool does not hold the wrapped native asset",
            ));
        }
        Some(wrapped)
    } else {
        None
    };
    full_assets(pool, |i| {
        let token = pool.token(i).ok()?.address();
        Some(if Some(token) == wrapped { Address::ZERO } else { token })
    })
}

/// Every snapshot token in order, the non-BPT ones replaced by `asset(i)`.
fn full_assets(
    pool: &ScaledPool<'_>,
    asset: impl Fn(usize) -> Option<Address>,
) -> Result<Vec<Address>, AmmError> {
    pool.snapshot()
        .tokens()
        .iter()
        .enumerate()
        .map(|(position, token)| match pool.index_of_position(position) {
            Some(i) => asset(i).ok_or(AmmError::InvalidToken("token index out of range")),
            None => Ok(token.address()),
        })
        .collect()
}

/// Spreads non-BPT amounts over the full asset list with zero for the BPT.
fn full_limits(pool: &ScaledPool<'_>, amounts: &[Amount]) -> Vec<Amount> {
    (0..pool.snapshot().tokens().len())
        .map(|position| {
            pool.index_of_position(position)
                .and_then(|i| amounts.get(i).copied())
                .unwrap_or(Amount::ZERO)
        })
        .collect()
}

/// Share `ratio` of a scaled balance, in raw units of token `index`, rounded
/// the same way for the multiplication and the downscale.
fn share_of_balance(
    pool: &ScaledPool<'_>,
    index: usize,
    balance: FixedPoint,
    ratio: FixedPoint,
    rounding: Rounding,
) -> Result<Amount, AmmError> {
    pool.downscale(index, balance.mul_round(ratio, rounding)?, rounding)
}

struct JoinPlan {
    expected_bpt_out: Amount,
    min_bpt_out: Amount,
    expected_amounts_in: Vec<Amount>,
    max_amounts_in: Vec<Amount>,
    user_data: JoinUserData,
    price_impact: FixedPoint,
}

fn proportional_join(
    pool: &ScaledPool<'_>,
    bpt_out: Amount,
    slippage: SlippageTolerance,
) -> Result<JoinPlan, AmmError> {
    let rounding = Rounding::for_user_payment();
    let ratio = bpt_value(bpt_out).div_round(pool.supply(), rounding)?;
    let mut expected = Vec::with_capacity(pool.len());
    let mut bounded = Vec::with_capacity(pool.len());
    for (i, balance) in pool.balances().iter().enumerate() {
        let amount = share_of_balance(pool, i, *balance, ratio, rounding)?;
        bounded.push(slippage.grow(amount)?);
        expected.push(amount);
    }
    Ok(JoinPlan {
        expected_bpt_out: bpt_out,
        min_bpt_out: bpt_out,
        expected_amounts_in: expected,
        max_amounts_in: bounded,
        user_data: JoinUserData::AllTokensInForExactBptOut { bpt_out },
        price_impact: FixedPoint::ZERO,
    })
}

/// Computes a join for any family.
pub(crate) fn join_with<M: BptMath + ?Sized>(
    math: &M,
    snapshot: &PoolSnapshot,
    request: &JoinRequest,
    network: Option<&NetworkConfig>,
) -> Result<JoinResult, AmmError> {
    snapshot.ensure_active()?;
    let pool = ScaledPool::new(snapshot)?;
    pool.require_supply()?;
    let (assets, native) = join_assets(&pool, request.tokens_in(), network)?;
    let slippage = request.slippage();

    let plan = match request.kind() {
        JoinKind::ExactTokensIn { amounts_in } => {
            let scaled = pool.upscale(amounts_in)?;
            let bpt = math.bpt_out_given_exact_tokens_in(&pool, &scaled)?;
            let expected_bpt_out = bpt_amount(bpt)?;
            if expected_bpt_out.is_zero() {
                return Err(AmmError::InsufficientLiquidity);
            }
            if math.proportional_only() {
                let mut plan = proportional_join(&pool, expected_bpt_out, slippage)?;
                // up-rounding must not quote more than the caller supplied
                for (expected, supplied) in plan.expected_amounts_in.iter_mut().zip(amounts_in) {
                    *expected = (*expected).min(*supplied);
                }
                plan
            } else {
                let min_bpt_out = slippage.shrink(expected_bpt_out)?;
                let zero = math.bpt_zero_price_impact(&pool, &scaled)?;
                JoinPlan {
                    expected_bpt_out,
                    min_bpt_out,
                    expected_amounts_in: amounts_in.clone(),
                    max_amounts_in: amounts_in.clone(),
                    user_data: JoinUserData::ExactTokensInForBptOut {
                        amounts_in: amounts_in.clone(),
                        min_bpt_out,
                    },
                    price_impact: clamp_price_impact(bpt, zero, true)?,
                }
            }
        }
        JoinKind::Proportional { bpt_out } => proportional_join(&pool, *bpt_out, slippage)?,
    };

    let value = native
        .and_then(|i| plan.max_amounts_in.get(i).copied())
        .unwrap_or(Amount::ZERO);
    let call = JoinPoolCall {
        pool_id: snapshot.id(),
        sender: request.sender(),
        recipient: request.recipient(),
        assets,
        max_amounts_in: full_limits(&pool, &plan.max_amounts_in),
        user_data: plan.user_data,
        from_internal_balance: false,
    };
    let to = network.map_or(snapshot_vault()?, NetworkConfig::vault);
    debug!(
        pool = %snapshot.id(),
        expected_bpt_out = %plan.expected_bpt_out,
        min_bpt_out = %plan.min_bpt_out,
        price_impact = %plan.price_impact,
        "join computed"
    );
    Ok(JoinResult::new(
        to,
        call,
        value,
        plan.expected_bpt_out,
        plan.min_bpt_out,
        plan.expected_amounts_in,
        plan.price_impact,
    ))
}

struct ExitPlan {
    expected_bpt_in: Amount,
    max_bpt_in: Amount,
    expected_amounts_out: Vec<Amount>,
    min_amounts_out: Vec<Amount>,
    user_data: ExitUserData,
    price_impact: FixedPoint,
}

fn check_bpt_in(snapshot: &PoolSnapshot, bpt_in: Amount) -> Result<(), AmmError> {
    if bpt_in > snapshot.total_shares() {
        return Err(AmmError::ExceedsPoolBalance);
    }
    Ok(())
}

/// Computes an exit for any family.
pub(crate) fn exit_with<M: BptMath + ?Sized>(
    math: &M,
    snapshot: &PoolSnapshot,
    request: &ExitRequest,
    network: Option<&NetworkConfig>,
) -> Result<ExitResult, AmmError> {
    snapshot.ensure_active()?;
    let pool = ScaledPool::new(snapshot)?;
    pool.require_supply()?;
    let assets = exit_assets(&pool, request.to_native(), network)?;
    let slippage = request.slippage();

    let plan = match request.kind() {
        ExitKind::Proportional { bpt_in } => {
            check_bpt_in(snapshot, *bpt_in)?;
            let rounding = Rounding::for_user_receipt();
            let ratio = bpt_value(*bpt_in).div_round(pool.supply(), rounding)?;
            let mut expected = Vec::with_capacity(pool.len());
            let mut bounded = Vec::with_capacity(pool.len());
            for (i, balance) in pool.balances().iter().enumerate() {
                let amount = share_of_balance(&pool, i, *balance, ratio, rounding)?;
                bounded.push(slippage.shrink(amount)?);
                expected.push(amount);
            }
            ExitPlan {
                expected_bpt_in: *bpt_in,
                max_bpt_in: *bpt_in,
                expected_amounts_out: expected,
                min_amounts_out: bounded,
                user_data: ExitUserData::ExactBptInForTokensOut { bpt_in: *bpt_in },
                price_impact: FixedPoint::ZERO,
            }
        }
        ExitKind::ExactTokensOut { amounts_out } => {
            let scaled = pool.upscale(amounts_out)?;
            for (i, amount) in amounts_out.iter().enumerate() {
                if *amount > pool.token(i)?.balance() {
                    return Err(AmmError::ExceedsPoolBalance);
                }
            }
            let bpt = math.bpt_in_given_exact_tokens_out(&pool, &scaled)?;
            let expected_bpt_in = bpt_amount(bpt)?;
            check_bpt_in(snapshot, expected_bpt_in)?;
            let max_bpt_in = slippage.grow(expected_bpt_in)?;
            let zero = math.bpt_zero_price_impact(&pool, &scaled)?;
            ExitPlan {
                expected_bpt_in,
                max_bpt_in,
                expected_amounts_out: amounts_out.clone(),
                min_amounts_out: amounts_out.clone(),
                user_data: ExitUserData::BptInForExactTokensOut {
                    amounts_out: amounts_out.clone(),
                    max_bpt_in,
                },
                price_impact: clamp_price_impact(bpt, zero, false)?,
            }
        }
        ExitKind::SingleToken { bpt_in, token } => {
            let lookup = network.map_or(*token, |n| n.wrap_native(*token));
            let index = pool
                .index_of(lookup)
                .ok_or(AmmError::InvalidToken("exit token is not in the pool"))?;
            check_bpt_in(snapshot, *bpt_in)?;
            let bpt = bpt_value(*bpt_in);
            let out = math.token_out_given_exact_bpt_in(&pool, index, bpt)?;
            let amount = pool.downscale(index, out, Rounding::for_user_receipt())?;
            if amount > pool.token(index)?.balance() {
                return Err(AmmError::ExceedsPoolBalance);
            }
            let mut expected = vec![Amount::ZERO; pool.len()];
            let mut bounded = vec![Amount::ZERO; pool.len()];
            let mut scaled = vec![FixedPoint::ZERO; pool.len()];
            if let (Some(e), Some(b), Some(s)) = (
                expected.get_mut(index),
                bounded.get_mut(index),
                scaled.get_mut(index),
            ) {
                *e = amount;
                *b = slippage.shrink(amount)?;
                *s = out;
            }
            let zero = math.bpt_zero_price_impact(&pool, &scaled)?;
            ExitPlan {
                expected_bpt_in: *bpt_in,
                max_bpt_in: *bpt_in,
                expected_amounts_out: expected,
                min_amounts_out: bounded,
                user_data: ExitUserData::ExactBptInForOneTokenOut {
                    bpt_in: *bpt_in,
                    exit_token_index: index,
                },
                price_impact: clamp_price_impact(bpt, zero, false)?,
            }
        }
    };

    let call = ExitPoolCall {
        pool_id: snapshot.id(),
        sender: request.sender(),
        recipient: request.recipient(),
        assets,
        min_amounts_out: full_limits(&pool, &plan.min_amounts_out),
        user_data: plan.user_data,
        to_internal_balance: false,
    };
    let to = network.map_or(snapshot_vault()?, NetworkConfig::vault);
    debug!(
        pool = %snapshot.id(),
        expected_bpt_in = %plan.expected_bpt_in,
        max_bpt_in = %plan.max_bpt_in,
        price_impact = %plan.price_impact,
        "exit computed"
    );
    Ok(ExitResult::new(
        to,
        call,
        plan.expected_bpt_in,
        plan.max_bpt_in,
        plan.expected_amounts_out,
        plan.price_impact,
    ))
}

/// The vault address for families resolved without a network
/// configuration. The vault shares one address across chains.
fn snapshot_vault() -> Result<Address, AmmError> {
    crate::config::VAULT_ADDRESS.parse()
}

/// Balance of `token` in whole tokens (decimals removed, no rate).
pub(crate) fn whole_balance(token: &PoolToken) -> Result<FixedPoint, AmmError> {
    FixedPoint::from_raw_u128(token.balance().get())
        .mul_down(FixedPoint::from_integer(token.decimals().scaling_factor()))
}

/// Values the pool's non-BPT holdings, filling missing prices with the
/// mean of the known ones.
pub(crate) fn liquidity_with_mean_price(
    snapshot: &PoolSnapshot,
    token_prices: &[Option<FixedPoint>],
) -> Result<FixedPoint, AmmError> {
    let pool = ScaledPool::new(snapshot)?;
    if token_prices.len() != pool.len() {
        return Err(AmmError::InvalidConfiguration(
            "token prices must match the pool's token count",
        ));
    }
    let known: Vec<FixedPoint> = token_prices.iter().flatten().copied().collect();
    if known.is_empty() {
        return Err(AmmError::InvalidToken("no token price is known"));
    }
    let mut sum = FixedPoint::ZERO;
    for price in &known {
        sum = sum.safe_add(price)?;
    }
    let mean = sum.div_down(FixedPoint::from_integer(known.len() as u128))?;

    let mut total = FixedPoint::ZERO;
    for (i, price) in token_prices.iter().enumerate() {
        let value = whole_balance(pool.token(i)?)?.mul_down(price.unwrap_or(mean))?;
        total = total.safe_add(&value)?;
    }
    Ok(total)
}
