//! Routes returned by an external router.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, PoolId};
use crate::error::AmmError;

/// Which side of a swap is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapKind {
    /// The amount in is fixed; the amount out is bounded from below.
    GivenIn,
    /// The amount out is fixed; the amount in is bounded from above.
    GivenOut,
}

impl SwapKind {
    /// Vault encoding of the kind (`0` given in, `1` given out).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::GivenIn => 0,
            Self::GivenOut => 1,
        }
    }
}

impl fmt::Display for SwapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GivenIn => write!(f, "GivenIn"),
            Self::GivenOut => write!(f, "GivenOut"),
        }
    }
}

/// One hop of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    /// Pool traded against.
    pub pool_id: PoolId,
    /// Token sent to the pool.
    pub token_in: Address,
    /// Token received from the pool.
    pub token_out: Address,
    /// Step amount; zero means "the previous step's output".
    pub amount: Amount,
    /// Opaque pool-specific data.
    #[serde(default, with = "hex_bytes")]
    pub user_data: Vec<u8>,
}

impl RouteStep {
    /// Step without user data.
    #[must_use]
    pub const fn new(pool_id: PoolId, token_in: Address, token_out: Address, amount: Amount) -> Self {
        Self {
            pool_id,
            token_in,
            token_out,
            amount,
            user_data: Vec::new(),
        }
    }
}

/// A route: ordered steps plus the deduplicated asset array used for
/// delta reporting.
///
/// Chaining between steps is the router's responsibility and is not
/// checked. Every step's tokens, as well as the route's own token in and
/// token out, must appear in [`assets`](Self::assets).
///
/// # Example
///
/// ```
/// use balancer_pool_core::domain::{Address, Amount, PoolId};
/// use balancer_pool_core::swaps::{Route, RouteStep, SwapKind};
///
/// let (dai, usdc) = (Address::from_bytes([1; 20]), Address::from_bytes([2; 20]));
/// let pool = PoolId::from_bytes([7; 32]);
/// let route = Route::new(
///     SwapKind::GivenIn,
///     dai,
///     usdc,
///     Amount::new(1_000),
///     Amount::new(990),
///     vec![RouteStep::new(pool, dai, usdc, Amount::new(1_000))],
///     vec![dai, usdc],
/// )
/// .expect("tokens are in the asset array");
/// assert_eq!(route.deltas().expect("fits"), vec![1_000, -990]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    kind: SwapKind,
    token_in: Address,
    token_out: Address,
    swap_amount: Amount,
    return_amount: Amount,
    steps: Vec<RouteStep>,
    assets: Vec<Address>,
}

impl Route {
    /// Creates and validates a route.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        kind: SwapKind,
        token_in: Address,
        token_out: Address,
        swap_amount: Amount,
        return_amount: Amount,
        steps: Vec<RouteStep>,
        assets: Vec<Address>,
    ) -> Result<Self, AmmError> {
        let route = Self {
            kind,
            token_in,
            token_out,
            swap_amount,
            return_amount,
            steps,
            assets,
        };
        route.validate()?;
        Ok(route)
    }

    /// Checks the asset array against the steps.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] when an asset is listed twice.
    /// - [`AmmError::InvalidToken`] when a token is missing from the assets.
    pub fn validate(&self) -> Result<(), AmmError> {
        for (i, asset) in self.assets.iter().enumerate() {
            if self.assets.iter().skip(i + 1).any(|other| other == asset) {
                return Err(AmmError::InvalidConfiguration("duplicate asset in route"));
            }
        }
        self.asset_index(self.token_in)?;
        self.asset_index(self.token_out)?;
        for step in &self.steps {
            self.asset_index(step.token_in)?;
            self.asset_index(step.token_out)?;
        }
        Ok(())
    }

    /// Returns the swap kind.
    #[must_use]
    pub const fn kind(&self) -> SwapKind {
        self.kind
    }

    /// Returns the token the caller provides.
    #[must_use]
    pub const fn token_in(&self) -> Address {
        self.token_in
    }

    /// Returns the token the caller receives.
    #[must_use]
    pub const fn token_out(&self) -> Address {
        self.token_out
    }

    /// Returns the fixed amount (in for given-in, out for given-out).
    #[must_use]
    pub const fn swap_amount(&self) -> Amount {
        self.swap_amount
    }

    /// Returns the quoted amount on the other side.
    #[must_use]
    pub const fn return_amount(&self) -> Amount {
        self.return_amount
    }

    /// Returns the ordered steps.
    #[must_use]
    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// Returns the asset array.
    #[must_use]
    pub fn assets(&self) -> &[Address] {
        &self.assets
    }

    /// Returns `true` when the router found no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Position of `token` in the asset array.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if the token is not an asset.
    pub fn asset_index(&self, token: Address) -> Result<usize, AmmError> {
        self.assets
            .iter()
            .position(|a| *a == token)
            .ok_or(AmmError::InvalidToken("token not in route assets"))
    }

    /// Amount paid by the caller.
    #[must_use]
    pub const fn amount_in(&self) -> Amount {
        match self.kind {
            SwapKind::GivenIn => self.swap_amount,
            SwapKind::GivenOut => self.return_amount,
        }
    }

    /// Amount received by the caller.
    #[must_use]
    pub const fn amount_out(&self) -> Amount {
        match self.kind {
            SwapKind::GivenIn => self.return_amount,
            SwapKind::GivenOut => self.swap_amount,
        }
    }

    /// Expected net vault delta per asset: positive for the token in,
    /// negative for the token out, zero for intermediate hops.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] when an amount exceeds `i128::MAX`.
    pub fn deltas(&self) -> Result<Vec<i128>, AmmError> {
        let amount_in = self.amount_in().to_signed()?;
        let amount_out = self.amount_out().to_signed()?;
        Ok(self
            .assets
            .iter()
            .map(|asset| {
                if *asset == self.token_in {
                    amount_in
                } else if *asset == self.token_out {
                    -amount_out
                } else {
                    0
                }
            })
            .collect())
    }
}

/// Hex (`0x…`) serde representation of user data.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn two_hop(kind: SwapKind) -> Route {
        let Ok(route) = Route::new(
            kind,
            addr(1),
            addr(3),
            Amount::new(1_000),
            Amount::new(2_000),
            vec![
                RouteStep::new(PoolId::from_bytes([0xaa; 32]), addr(1), addr(2), Amount::new(1_000)),
                RouteStep::new(PoolId::from_bytes([0xbb; 32]), addr(2), addr(3), Amount::ZERO),
            ],
            vec![addr(1), addr(2), addr(3)],
        ) else {
            panic!("valid route");
        };
        route
    }

    #[test]
    fn deltas_given_in() {
        let Ok(deltas) = two_hop(SwapKind::GivenIn).deltas() else {
            panic!("deltas");
        };
        assert_eq!(deltas, vec![1_000, 0, -2_000]);
    }

    #[test]
    fn deltas_given_out_swap_sides() {
        let Ok(deltas) = two_hop(SwapKind::GivenOut).deltas() else {
            panic!("deltas");
        };
        assert_eq!(deltas, vec![2_000, 0, -1_000]);
    }

    #[test]
    fn step_token_outside_assets_is_rejected() {
        let result = Route::new(
            SwapKind::GivenIn,
            addr(1),
            addr(2),
            Amount::new(1),
            Amount::new(1),
            vec![RouteStep::new(PoolId::from_bytes([1; 32]), addr(1), addr(9), Amount::new(1))],
            vec![addr(1), addr(2)],
        );
        assert_eq!(result, Err(AmmError::InvalidToken("token not in route assets")));
    }

    #[test]
    fn duplicate_assets_are_rejected() {
        let result = Route::new(
            SwapKind::GivenIn,
            addr(1),
            addr(2),
            Amount::new(1),
            Amount::new(1),
            Vec::new(),
            vec![addr(1), addr(2), addr(1)],
        );
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
    }

    #[test]
    fn json_round_trip_keeps_user_data() {
        let mut route = two_hop(SwapKind::GivenIn);
        let Some(first) = route.steps.first_mut() else {
            panic!("two steps");
        };
        first.user_data = vec![0xde, 0xad];
        let Ok(json) = serde_json::to_string(&route) else {
            panic!("serialize");
        };
        assert!(json.contains("\"userData\":\"0xdead\""));
        let Ok(back) = serde_json::from_str::<Route>(&json) else {
            panic!("deserialize");
        };
        assert_eq!(back, route);
    }

    #[test]
    fn swap_kind_encoding() {
        assert_eq!(SwapKind::GivenIn.as_u8(), 0);
        assert_eq!(SwapKind::GivenOut.as_u8(), 1);
        assert_eq!(SwapKind::GivenOut.to_string(), "GivenOut");
    }
}
