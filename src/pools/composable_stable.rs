//! Composable-stable pool concerns.
//!
//! These pools register their own BPT as a token. The BPT is dropped from
//! the math and from user-data amounts, but still listed in the vault call
//! with a zero limit.

use super::stable::stable_family_concerns;
use crate::config::NetworkConfig;

/// Concerns of composable-stable pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposableStableConcerns {
    network: NetworkConfig,
}

impl ComposableStableConcerns {
    /// Creates composable-stable concerns for `network`.
    #[must_use]
    pub const fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    /// Returns the network configuration.
    #[must_use]
    pub const fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

stable_family_concerns!(ComposableStableConcerns, |this| Some(&this.network));
