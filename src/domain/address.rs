//! 20-byte EVM account address.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmmError;

/// An EVM address (token, pool, vault or account).
///
/// The all-zero address stands for the chain's native asset wherever a token
/// is expected; see [`Address::is_native`].
///
/// Parsed from and displayed as `0x`-prefixed hex. Parsing is
/// case-insensitive and does not verify EIP-55 checksums.
///
/// # Examples
///
/// ```
/// use balancer_pool_core::domain::Address;
///
/// let vault: Address = "0xBA12222222228d8Ba445958a75a0704d566BF2C8".parse().expect("valid");
/// assert_eq!(vault.to_string(), "0xba12222222228d8ba445958a75a0704d566bf2c8");
/// assert!(Address::ZERO.is_native());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The zero address, used for the native asset.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 20-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Returns `true` for the zero address.
    #[must_use]
    pub fn is_native(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AmmError::InvalidAmount("expected 20-byte hex address"))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_case() {
        let Ok(a) = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse::<Address>() else {
            panic!("expected Ok");
        };
        assert_eq!(a.as_bytes()[0], 0xc0);
        assert_eq!(a.to_string(), "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    }

    #[test]
    fn parse_without_prefix() {
        let Ok(a) = "0000000000000000000000000000000000000001".parse::<Address>() else {
            panic!("expected Ok");
        };
        assert_eq!(a.as_bytes()[19], 1);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz00000000000000000000000000000000000000".parse::<Address>().is_err());
    }

    #[test]
    fn zero_is_native() {
        assert!(Address::ZERO.is_native());
        assert!(!Address::from_bytes([1u8; 20]).is_native());
    }

    #[test]
    fn serde_as_hex_string() {
        let a = Address::from_bytes([0xab; 20]);
        let Ok(json) = serde_json::to_string(&a) else {
            panic!("serialize");
        };
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(20)));
        let Ok(back) = serde_json::from_str::<Address>(&json) else {
            panic!("deserialize");
        };
        assert_eq!(back, a);
    }
}
