//! A token held by a pool, as captured in a snapshot.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, Decimals, Rounding};
use crate::error::AmmError;
use crate::math::FixedPoint;

fn default_price_rate() -> FixedPoint {
    FixedPoint::ONE
}

/// One entry of a pool's ordered token list.
///
/// `balance` is in the token's raw units. Pool math works on
/// [`upscale`](Self::upscale)d balances: 18 decimals, multiplied by the
/// token's price rate.
///
/// # Examples
///
/// ```
/// use balancer_pool_core::domain::{Address, Amount, Decimals, PoolToken};
/// use balancer_pool_core::math::FixedPoint;
///
/// let usdc = PoolToken::new(
///     Address::from_bytes([1u8; 20]),
///     Amount::new(5_000_000),
///     Decimals::new(6).expect("valid"),
/// );
/// assert_eq!(usdc.scaled_balance().expect("ok"), FixedPoint::from_integer(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolToken {
    address: Address,
    balance: Amount,
    #[serde(default)]
    decimals: Decimals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<FixedPoint>,
    #[serde(default = "default_price_rate")]
    price_rate: FixedPoint,
}

impl PoolToken {
    /// Creates a token entry with price rate `1.0` and no weight.
    #[must_use]
    pub const fn new(address: Address, balance: Amount, decimals: Decimals) -> Self {
        Self {
            address,
            balance,
            decimals,
            weight: None,
            price_rate: FixedPoint::ONE,
        }
    }

    /// Sets the normalized weight (weighted pools).
    #[must_use]
    pub fn with_weight(mut self, weight: FixedPoint) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets the price rate (rate-provider pools, wrapped tokens, FX numeraire rate).
    #[must_use]
    pub fn with_price_rate(mut self, rate: FixedPoint) -> Self {
        self.price_rate = rate;
        self
    }

    /// Returns the token address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the raw balance.
    pub const fn balance(&self) -> Amount {
        self.balance
    }

    /// Returns the token decimals.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Returns the normalized weight, if any.
    #[must_use]
    pub const fn weight(&self) -> Option<FixedPoint> {
        self.weight
    }

    /// Returns the price rate.
    pub const fn price_rate(&self) -> FixedPoint {
        self.price_rate
    }

    /// `10^(18 - decimals) · price_rate`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the product overflows.
    pub fn scaling_factor(&self) -> Result<FixedPoint, AmmError> {
        FixedPoint::from_integer(self.decimals.scaling_factor()).mul_down(self.price_rate)
    }

    /// Brings a raw amount of this token into the 18-decimal math domain.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the product overflows.
    pub fn upscale(&self, amount: Amount) -> Result<FixedPoint, AmmError> {
        FixedPoint::from_raw_u128(amount.get()).mul_down(self.scaling_factor()?)
    }

    /// Converts a math-domain value back to raw units of this token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] for a zero price rate and
    /// [`AmmError::Overflow`] if the result exceeds `u128`.
    pub fn downscale(&self, value: FixedPoint, rounding: Rounding) -> Result<Amount, AmmError> {
        let raw = value.div_round(self.scaling_factor()?, rounding)?;
        raw.raw_u128().map(Amount::new)
    }

    /// Returns the upscaled balance.
    ///
    /// # Errors
    ///
    /// See [`upscale`](Self::upscale).
    pub fn scaled_balance(&self) -> Result<FixedPoint, AmmError> {
        self.upscale(self.balance)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn token(decimals: u8, balance: u128) -> PoolToken {
        let Ok(d) = Decimals::new(decimals) else {
            panic!("valid decimals");
        };
        PoolToken::new(Address::from_bytes([9u8; 20]), Amount::new(balance), d)
    }

    #[test]
    fn upscale_six_decimals() {
        let t = token(6, 0);
        assert_eq!(t.upscale(Amount::new(1_500_000)), Ok(FixedPoint::from_raw_u128(1_500_000_000_000_000_000)));
    }

    #[test]
    fn rate_applies_to_upscale() {
        let Ok(rate) = "1.05".parse::<FixedPoint>() else {
            panic!("rate");
        };
        let t = token(18, 0).with_price_rate(rate);
        assert_eq!(t.upscale(Amount::new(2_000_000_000_000_000_000)), Ok(FixedPoint::from_raw_u128(2_100_000_000_000_000_000)));
    }

    #[test]
    fn downscale_rounds_as_requested() {
        let t = token(6, 0);
        // 1.0000005 units of a 6-decimal token
        let value = FixedPoint::from_raw_u128(1_000_000_500_000_000_000);
        assert_eq!(t.downscale(value, Rounding::Down), Ok(Amount::new(1_000_000)));
        assert_eq!(t.downscale(value, Rounding::Up), Ok(Amount::new(1_000_001)));
    }

    #[test]
    fn defaults_from_json() {
        let json = r#"{"address":"0x0101010101010101010101010101010101010101","balance":"10"}"#;
        let Ok(t) = serde_json::from_str::<PoolToken>(json) else {
            panic!("deserialize");
        };
        assert_eq!(t.decimals(), Decimals::MAX);
        assert_eq!(t.price_rate(), FixedPoint::ONE);
        assert_eq!(t.weight(), None);
    }

    #[test]
    fn weight_from_json() {
        let json = r#"{"address":"0x0101010101010101010101010101010101010101","balance":"10","decimals":6,"weight":"0.8","priceRate":"1"}"#;
        let Ok(t) = serde_json::from_str::<PoolToken>(json) else {
            panic!("deserialize");
        };
        assert_eq!(t.weight().map(|w| w.to_string()), Some("0.8".to_owned()));
    }
}
