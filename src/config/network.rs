//! Per-network addressing.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Address;
use crate::error::AmmError;

/// Balancer V2 vault, deployed at the same address on every supported chain.
pub const VAULT_ADDRESS: &str = "0xBA12222222228d8Ba445958a75a0704d566BF2C8";

/// Chains with a Balancer V2 deployment, keyed by chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u64)]
pub enum Network {
    /// Ethereum mainnet.
    Mainnet = 1,
    /// Görli testnet.
    Goerli = 5,
    /// OP mainnet.
    Optimism = 10,
    /// Gnosis chain.
    Gnosis = 100,
    /// Polygon PoS.
    Polygon = 137,
    /// Fantom opera.
    Fantom = 250,
    /// Base.
    Base = 8453,
    /// Polygon zkEVM.
    ZkEvm = 1101,
    /// Arbitrum one.
    Arbitrum = 42161,
    /// Avalanche C-chain.
    Avalanche = 43114,
    /// Sepolia testnet.
    Sepolia = 11_155_111,
    /// Berachain Artio testnet.
    Artio = 80085,
    /// Taiko Katla testnet.
    Katla = 167_008,
}

impl Network {
    /// Every known network.
    pub const ALL: [Self; 13] = [
        Self::Mainnet,
        Self::Goerli,
        Self::Optimism,
        Self::Gnosis,
        Self::Polygon,
        Self::Fantom,
        Self::Base,
        Self::ZkEvm,
        Self::Arbitrum,
        Self::Avalanche,
        Self::Sepolia,
        Self::Artio,
        Self::Katla,
    ];

    /// Returns the EIP-155 chain id.
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        self as u64
    }

    /// Looks a network up by chain id.
    #[must_use]
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }

    /// Wrapped native token address for networks with a built-in table.
    const fn wrapped_native_asset(self) -> Option<&'static str> {
        match self {
            Self::Mainnet => Some("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            Self::Polygon => Some("0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
            Self::Arbitrum => Some("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
            Self::Optimism | Self::Base => Some("0x4200000000000000000000000000000000000006"),
            Self::Gnosis => Some("0xe91D153E0b41518A2Ce8Dd3D7944Fa863463a97d"),
            Self::Avalanche => Some("0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7"),
            Self::Goerli
            | Self::Fantom
            | Self::ZkEvm
            | Self::Sepolia
            | Self::Artio
            | Self::Katla => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", self.chain_id())
    }
}

/// Addresses the pool concerns and the swap builder need on one chain.
///
/// Built-in tables exist for the main production networks via
/// [`for_network`](Self::for_network); any other chain can be described
/// with [`new`](Self::new) or deserialized from JSON.
///
/// # Examples
///
/// ```
/// use balancer_pool_core::config::{Network, NetworkConfig};
///
/// let cfg = NetworkConfig::for_network(Network::Mainnet).expect("built in");
/// assert_eq!(cfg.chain_id(), 1);
/// assert!(NetworkConfig::for_network(Network::Sepolia).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    chain_id: u64,
    vault: Address,
    wrapped_native_asset: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relayer: Option<Address>,
}

impl NetworkConfig {
    /// Creates a configuration for an arbitrary chain.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the vault or the
    /// wrapped native asset is the zero address.
    pub fn new(
        chain_id: u64,
        vault: Address,
        wrapped_native_asset: Address,
        relayer: Option<Address>,
    ) -> Result<Self, AmmError> {
        if vault.is_native() {
            return Err(AmmError::InvalidConfiguration("vault must not be the zero address"));
        }
        if wrapped_native_asset.is_native() {
            return Err(AmmError::InvalidConfiguration(
                "wrapped native asset must not be the zero address",
            ));
        }
        Ok(Self {
            chain_id,
            vault,
            wrapped_native_asset,
            relayer,
        })
    }

    /// Returns the built-in configuration for `network`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] for networks without a
    /// built-in address table.
    pub fn for_network(network: Network) -> Result<Self, AmmError> {
        let wrapped = network
            .wrapped_native_asset()
            .ok_or(AmmError::InvalidConfiguration("no built-in addresses for network"))?;
        Self::new(network.chain_id(), VAULT_ADDRESS.parse()?, wrapped.parse()?, None)
    }

    /// Returns the chain id.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Returns the vault address, the destination of every join, exit and swap.
    #[must_use]
    pub const fn vault(&self) -> Address {
        self.vault
    }

    /// Returns the wrapped native token the zero address maps onto.
    #[must_use]
    pub const fn wrapped_native_asset(&self) -> Address {
        self.wrapped_native_asset
    }

    /// Returns the relayer, if one is configured.
    #[must_use]
    pub const fn relayer(&self) -> Option<Address> {
        self.relayer
    }

    /// Sets the relayer used for join/exit routes.
    #[must_use]
    pub const fn with_relayer(mut self, relayer: Address) -> Self {
        self.relayer = Some(relayer);
        self
    }

    /// Maps the zero address onto the wrapped native token; other
    /// addresses pass through.
    #[must_use]
    pub fn wrap_native(&self, token: Address) -> Address {
        if token.is_native() {
            self.wrapped_native_asset
        } else {
            token
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn mainnet() -> NetworkConfig {
        let Ok(cfg) = NetworkConfig::for_network(Network::Mainnet) else {
            panic!("mainnet is built in");
        };
        cfg
    }

    #[test]
    fn chain_ids_round_trip() {
        for network in Network::ALL {
            assert_eq!(Network::from_chain_id(network.chain_id()), Some(network));
        }
        assert_eq!(Network::from_chain_id(31337), None);
        assert_eq!(Network::Arbitrum.chain_id(), 42161);
    }

    #[test]
    fn vault_is_shared() {
        for network in [Network::Polygon, Network::Base, Network::Avalanche] {
            let Ok(cfg) = NetworkConfig::for_network(network) else {
                panic!("{network} is built in");
            };
            assert_eq!(cfg.vault(), mainnet().vault());
        }
    }

    #[test]
    fn testnets_have_no_table() {
        assert!(matches!(
            NetworkConfig::for_network(Network::Goerli),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_vault_rejected() {
        let weth = mainnet().wrapped_native_asset();
        assert!(NetworkConfig::new(1, Address::ZERO, weth, None).is_err());
        assert!(NetworkConfig::new(1, weth, Address::ZERO, None).is_err());
    }

    #[test]
    fn wrap_native_only_touches_zero() {
        let cfg = mainnet();
        let other = Address::from_bytes([7u8; 20]);
        assert_eq!(cfg.wrap_native(Address::ZERO), cfg.wrapped_native_asset());
        assert_eq!(cfg.wrap_native(other), other);
    }

    #[test]
    fn json_round_trip() {
        let cfg = mainnet().with_relayer(Address::from_bytes([3u8; 20]));
        let Ok(json) = serde_json::to_string(&cfg) else {
            panic!("serialize");
        };
        assert!(json.contains("wrappedNativeAsset"));
        let Ok(back) = serde_json::from_str::<NetworkConfig>(&json) else {
            panic!("deserialize");
        };
        assert_eq!(back, cfg);
    }
}
