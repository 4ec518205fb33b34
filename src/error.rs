//! Unified error types for the pool-math core.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type. Every failure is surfaced synchronously; nothing is retried
//! internally and no partial results are returned.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure the core can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// The pool-type tag is not part of the recognized set.
    #[error("unsupported pool type: {0}")]
    UnsupportedPoolType(String),

    /// The snapshot marks the pool as paused.
    #[error("pool is paused")]
    PoolPaused,

    /// The operation would mint or burn nothing, or the pool holds no supply.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// An exit asked for more of a token than the pool holds.
    #[error("requested amount exceeds pool balance")]
    ExceedsPoolBalance,

    /// An iterative invariant solver ran out of iterations.
    #[error("invariant did not converge: {0}")]
    InvariantDidNotConverge(&'static str),

    /// Division by zero in fixed-point or integer arithmetic.
    #[error("division by zero")]
    DivisionByZero,

    /// Slippage tolerance outside `0..=10_000` basis points.
    #[error("invalid slippage tolerance: {0} bps (expected 0..=10000)")]
    InvalidTolerance(u32),

    /// A swap builder was finalized before every required field was set.
    #[error("swap builder not configured: missing {0}")]
    BuilderNotConfigured(&'static str),

    /// A route contained no swap steps.
    #[error("route contains no swap steps")]
    EmptyRoute,

    /// Arithmetic result exceeds the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic result would be negative.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// A token is not part of the pool or route it was used with.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// Structurally invalid snapshot, request or configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Pool weights are missing, zero, or do not sum to one.
    #[error("invalid weight: {0}")]
    InvalidWeight(&'static str),

    /// A textual amount, address or identifier could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// The pool family does not implement the requested operation.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// The route uses join/exit paths that cannot be executed by a plain
    /// vault swap.
    #[error("join/exit path unsupported: {0}")]
    JoinExitPathUnsupported(&'static str),

    /// Quoted deltas fall outside the limits computed for the swap.
    #[error("slippage exceeded for asset index {index}")]
    SlippageExceeded {
        /// Index into the route's asset array.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unsupported_pool_type() {
        let err = AmmError::UnsupportedPoolType("UnknownType".to_owned());
        assert_eq!(err.to_string(), "unsupported pool type: UnknownType");
    }

    #[test]
    fn display_tolerance() {
        let err = AmmError::InvalidTolerance(10_001);
        assert!(err.to_string().contains("10001"));
    }

    #[test]
    fn slippage_and_path_errors_are_distinct() {
        let a = AmmError::SlippageExceeded { index: 0 };
        let b = AmmError::JoinExitPathUnsupported("exact out");
        assert_ne!(a, b);
    }
}
