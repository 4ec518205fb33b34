//! Immutable pool state consumed by every pool-math concern.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, PoolId, PoolToken, PoolType};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, FixedPoint};

/// Bounds of the stable amplification parameter.
pub const MIN_AMP: u64 = 1;
/// Upper bound of the stable amplification parameter.
pub const MAX_AMP: u64 = 5_000;

/// Accepted distance of the weight sum from `1.0` (decimal rounding in
/// indexer data).
const WEIGHT_SUM_TOLERANCE: u128 = 1_000_000_000_000;

/// Parameters of a linear pool.
///
/// Targets are in raw units of the main token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearParams {
    main_index: usize,
    wrapped_index: usize,
    lower_target: Amount,
    upper_target: Amount,
}

impl LinearParams {
    /// Creates linear parameters.
    #[must_use]
    pub const fn new(
        main_index: usize,
        wrapped_index: usize,
        lower_target: Amount,
        upper_target: Amount,
    ) -> Self {
        Self {
            main_index,
            wrapped_index,
            lower_target,
            upper_target,
        }
    }

    /// Index of the main token.
    #[must_use]
    pub const fn main_index(&self) -> usize {
        self.main_index
    }

    /// Index of the wrapped token.
    #[must_use]
    pub const fn wrapped_index(&self) -> usize {
        self.wrapped_index
    }

    /// Lower main-balance target.
    pub const fn lower_target(&self) -> Amount {
        self.lower_target
    }

    /// Upper main-balance target.
    pub const fn upper_target(&self) -> Amount {
        self.upper_target
    }
}

/// Curve parameters of a Gyroscope pool. The variant must match the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GyroParams {
    /// 2-CLP: price range `[alpha, beta]` given by its square roots.
    #[serde(rename = "Gyro2", rename_all = "camelCase")]
    TwoClp {
        /// `sqrt(alpha)`
        sqrt_alpha: FixedPoint,
        /// `sqrt(beta)`
        sqrt_beta: FixedPoint,
    },
    /// 3-CLP: symmetric range `[alpha, 1/alpha]` around each pair.
    #[serde(rename = "Gyro3", rename_all = "camelCase")]
    ThreeClp {
        /// `alpha^(1/3)`
        root3_alpha: FixedPoint,
    },
    /// E-CLP: elliptic concentrated liquidity.
    #[serde(rename = "GyroE")]
    EClp {
        /// Lower price bound.
        alpha: FixedPoint,
        /// Upper price bound.
        beta: FixedPoint,
        /// Cosine of the rotation angle.
        c: FixedPoint,
        /// Sine of the rotation angle.
        s: FixedPoint,
        /// Stretching factor.
        lambda: FixedPoint,
    },
}

impl GyroParams {
    /// The pool-type tag this parameter set belongs to.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::TwoClp { .. } => "Gyro2",
            Self::ThreeClp { .. } => "Gyro3",
            Self::EClp { .. } => "GyroE",
        }
    }

    fn validate(&self) -> Result<(), AmmError> {
        let well_formed = match self {
            Self::TwoClp {
                sqrt_alpha,
                sqrt_beta,
            } => !sqrt_alpha.is_zero() && sqrt_alpha < sqrt_beta,
            Self::ThreeClp { root3_alpha } => {
                !root3_alpha.is_zero() && *root3_alpha < FixedPoint::ONE
            }
            Self::EClp {
                alpha, beta, lambda, ..
            } => !alpha.is_zero() && alpha < beta && *lambda >= FixedPoint::ONE,
        };
        if !well_formed {
            return Err(AmmError::InvalidConfiguration("malformed gyro parameters"));
        }
        Ok(())
    }
}

/// Point-in-time state of one pool.
///
/// Token order is the vault's registration order and is preserved by every
/// operation. `total_shares` is the circulating BPT supply: for pools that
/// hold their own BPT it excludes the pool's balance of it.
///
/// # Validation
///
/// [`validate`](Self::validate) checks:
///
/// - at least two tokens, no duplicate addresses;
/// - swap fee below `1.0`;
/// - the tag is a known pool type;
/// - weighted: every weight present, non-zero, summing to `1.0`;
/// - stable family: amplification in `[1, 5000]`;
/// - BPT-holding families: the pool's own address is among the tokens;
/// - linear: parameters present, indices distinct and in range,
///   `lower_target <= upper_target`;
/// - Gyro: parameters present, matching the tag, well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    id: PoolId,
    address: Address,
    pool_type: String,
    tokens: Vec<PoolToken>,
    swap_fee: FixedPoint,
    total_shares: Amount,
    #[serde(default)]
    paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    linear: Option<LinearParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gyro: Option<GyroParams>,
}

impl PoolSnapshot {
    /// Creates an unpaused snapshot without family-specific parameters.
    #[must_use]
    pub fn new(
        id: PoolId,
        pool_type: impl Into<String>,
        tokens: Vec<PoolToken>,
        swap_fee: FixedPoint,
        total_shares: Amount,
    ) -> Self {
        Self {
            id,
            address: id.address(),
            pool_type: pool_type.into(),
            tokens,
            swap_fee,
            total_shares,
            paused: false,
            amp: None,
            linear: None,
            gyro: None,
        }
    }

    /// Sets the amplification parameter (stable family).
    #[must_use]
    pub fn with_amp(mut self, amp: u64) -> Self {
        self.amp = Some(amp);
        self
    }

    /// Sets linear pool parameters.
    #[must_use]
    pub fn with_linear(mut self, params: LinearParams) -> Self {
        self.linear = Some(params);
        self
    }

    /// Sets Gyroscope parameters.
    #[must_use]
    pub fn with_gyro(mut self, params: GyroParams) -> Self {
        self.gyro = Some(params);
        self
    }

    /// Sets the paused flag.
    #[must_use]
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Returns the pool id.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Returns the pool contract address (also the BPT address).
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the raw pool-type tag.
    #[must_use]
    pub fn pool_type(&self) -> &str {
        &self.pool_type
    }

    /// Parses the tag into a [`PoolType`].
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnsupportedPoolType`] for unknown tags.
    pub fn kind(&self) -> Result<PoolType, AmmError> {
        self.pool_type.parse()
    }

    /// Returns the ordered token list.
    #[must_use]
    pub fn tokens(&self) -> &[PoolToken] {
        &self.tokens
    }

    /// Returns the swap fee as a fraction.
    pub const fn swap_fee(&self) -> FixedPoint {
        self.swap_fee
    }

    /// Returns the circulating BPT supply.
    pub const fn total_shares(&self) -> Amount {
        self.total_shares
    }

    /// Returns `true` if the pool is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns the amplification parameter.
    #[must_use]
    pub const fn amp(&self) -> Option<u64> {
        self.amp
    }

    /// Returns the linear parameters.
    #[must_use]
    pub const fn linear(&self) -> Option<&LinearParams> {
        self.linear.as_ref()
    }

    /// Returns the Gyroscope parameters.
    #[must_use]
    pub const fn gyro(&self) -> Option<&GyroParams> {
        self.gyro.as_ref()
    }

    /// Position of the pool's own BPT in the token list.
    #[must_use]
    pub fn bpt_index(&self) -> Option<usize> {
        self.token_index(self.address)
    }

    /// Position of `token` in the token list.
    #[must_use]
    pub fn token_index(&self, token: Address) -> Option<usize> {
        self.tokens.iter().position(|t| t.address() == token)
    }

    /// Fails with [`AmmError::PoolPaused`] on a paused pool.
    ///
    /// # Errors
    ///
    /// See above.
    pub const fn ensure_active(&self) -> Result<(), AmmError> {
        if self.paused {
            return Err(AmmError::PoolPaused);
        }
        Ok(())
    }

    /// Validates all snapshot invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnsupportedPoolType`] for unknown tags.
    /// - [`AmmError::InvalidWeight`] for missing, zero or unnormalized weights.
    /// - [`AmmError::InvalidConfiguration`] for every other violation.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.tokens.len() < 2 {
            return Err(AmmError::InvalidConfiguration(
                "at least 2 tokens are required",
            ));
        }

        let mut iter = self.tokens.iter();
        while let Some(token) = iter.next() {
            for other in iter.clone() {
                if token.address() == other.address() {
                    return Err(AmmError::InvalidConfiguration(
                        "duplicate token addresses are not allowed",
                    ));
                }
            }
        }

        if self.swap_fee >= FixedPoint::ONE {
            return Err(AmmError::InvalidConfiguration("swap fee must be below 1"));
        }

        let kind = self.kind()?;
        match kind {
            PoolType::Weighted => self.validate_weights()?,
            PoolType::Stable | PoolType::MetaStable => self.validate_amp()?,
            PoolType::ComposableStable | PoolType::StablePhantom => {
                self.validate_amp()?;
                self.validate_bpt_listed()?;
            }
            PoolType::Linear => {
                self.validate_bpt_listed()?;
                self.validate_linear()?;
            }
            PoolType::Fx => {}
            PoolType::Gyro => {
                let params = self
                    .gyro
                    .ok_or(AmmError::InvalidConfiguration("gyro parameters missing"))?;
                if params.tag() != self.pool_type {
                    return Err(AmmError::InvalidConfiguration(
                        "gyro parameters do not match the pool type",
                    ));
                }
                params.validate()?;
            }
        }
        Ok(())
    }

    fn validate_weights(&self) -> Result<(), AmmError> {
        let mut sum = FixedPoint::ZERO;
        for token in &self.tokens {
            let weight = token
                .weight()
                .ok_or(AmmError::InvalidWeight("weighted pool token without weight"))?;
            if weight.is_zero() {
                return Err(AmmError::InvalidWeight(
                    "all individual weights must be greater than zero",
                ));
            }
            sum = sum.safe_add(&weight)?;
        }
        let distance = if sum > FixedPoint::ONE {
            sum.saturating_sub(FixedPoint::ONE)
        } else {
            FixedPoint::ONE.saturating_sub(sum)
        };
        if distance > FixedPoint::from_raw_u128(WEIGHT_SUM_TOLERANCE) {
            return Err(AmmError::InvalidWeight("weights must sum to 1"));
        }
        Ok(())
    }

    fn validate_amp(&self) -> Result<(), AmmError> {
        match self.amp {
            Some(amp) if (MIN_AMP..=MAX_AMP).contains(&amp) => Ok(()),
            Some(_) => Err(AmmError::InvalidConfiguration(
                "amplification must be within 1..=5000",
            )),
            None => Err(AmmError::InvalidConfiguration(
                "stable pool without amplification",
            )),
        }
    }

    fn validate_bpt_listed(&self) -> Result<(), AmmError> {
        self.bpt_index().map(|_| ()).ok_or(AmmError::InvalidConfiguration(
            "pool does not list its own BPT",
        ))
    }

    fn validate_linear(&self) -> Result<(), AmmError> {
        let params = self
            .linear
            .ok_or(AmmError::InvalidConfiguration("linear parameters missing"))?;
        let bpt = self.bpt_index();
        let (main, wrapped) = (params.main_index(), params.wrapped_index());
        if main == wrapped
            || main >= self.tokens.len()
            || wrapped >= self.tokens.len()
            || bpt == Some(main)
            || bpt == Some(wrapped)
        {
            return Err(AmmError::InvalidConfiguration(
                "linear main/wrapped indices are invalid",
            ));
        }
        if params.lower_target() > params.upper_target() {
            return Err(AmmError::InvalidConfiguration(
                "linear lower target exceeds upper target",
            ));
        }
        Ok(())
    }
}
