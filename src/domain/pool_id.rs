//! 32-byte vault pool identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Address;
use crate::error::AmmError;

/// Identifier of a pool registered in the vault.
///
/// The first 20 bytes are the pool contract address; the remaining bytes
/// carry the specialization and a registration nonce.
///
/// # Examples
///
/// ```
/// use balancer_pool_core::domain::PoolId;
///
/// let id: PoolId = "0x5c6ee304399dbdb9c8ef030ab642b10820db8f56000200000000000000000014"
///     .parse()
///     .expect("valid");
/// assert_eq!(
///     id.address().to_string(),
///     "0x5c6ee304399dbdb9c8ef030ab642b10820db8f56"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PoolId([u8; 32]);

impl PoolId {
    /// Creates a `PoolId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the pool contract address embedded in the id.
    #[must_use]
    pub fn address(&self) -> Address {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(self.0.get(..20).unwrap_or(&[0u8; 20]));
        Address::from_bytes(bytes)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for PoolId {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AmmError::InvalidAmount("expected 32-byte hex pool id"))?;
        Ok(Self(bytes))
    }
}

impl Serialize for PoolId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PoolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
