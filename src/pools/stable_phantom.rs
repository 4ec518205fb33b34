//! Legacy stable-phantom pool concerns.
//!
//! Same curve and BPT handling as composable-stable pools. These concerns
//! are resolved without a network configuration, so the native asset is
//! not accepted in joins or exits.

use super::stable::stable_family_concerns;

/// Concerns of stable-phantom pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StablePhantomConcerns;

impl StablePhantomConcerns {
    /// Creates stable-phantom concerns.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

stable_family_concerns!(StablePhantomConcerns, |_this| None);
