//! Explicit rounding direction for arithmetic operations.

/// Rounding direction for every division and fixed-point multiplication.
///
/// The core never rounds implicitly. The direction is always chosen so the
/// pool keeps the dust:
///
/// | Quantity | Direction |
/// |----------|-----------|
/// | Tokens or BPT the user receives | [`Rounding::Down`] |
/// | Tokens or BPT the user pays | [`Rounding::Up`] |
///
/// # Examples
///
/// ```
/// use balancer_pool_core::domain::Rounding;
///
/// assert_eq!(Rounding::for_user_payment(), Rounding::Up);
/// assert_eq!(Rounding::for_user_receipt(), Rounding::Down);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Away from zero (ceiling for non-negative values).
    Up,
    /// Towards zero (floor for non-negative values).
    Down,
}

impl Rounding {
    /// Direction for amounts the user must pay into the pool.
    #[must_use]
    pub const fn for_user_payment() -> Self {
        Self::Up
    }

    /// Direction for amounts the user receives from the pool.
    #[must_use]
    pub const fn for_user_receipt() -> Self {
        Self::Down
    }
}
