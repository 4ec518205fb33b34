//! Rounding helpers for integer division.
//!
//! [`div_round`] divides raw `u128` amounts and [`div_round_u256`] divides the
//! 256-bit intermediates used by fixed-point and slippage arithmetic. Both
//! take an explicit [`Rounding`] direction.
//!
//! # Convention
//!
//! Round against the user:
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Amount out, BPT out, min limit | [`Rounding::Down`] |
//! | Amount in, BPT in, max limit | [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use balancer_pool_core::domain::Rounding;
//! use balancer_pool_core::math::div_round;
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(div_round(0, 5, Rounding::Up), Some(0));
//! assert_eq!(div_round(10, 0, Rounding::Down), None);
//! ```

use primitive_types::U256;

use crate::domain::Rounding;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Some(q),
        Rounding::Up => {
            // q + 1 cannot overflow: a remainder implies denominator > 1
            if numerator % denominator != 0 {
                Some(q + 1)
            } else {
                Some(q)
            }
        }
    }
}

/// Integer division of `U256` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub fn div_round_u256(numerator: U256, denominator: U256, rounding: Rounding) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let (q, r) = numerator.div_mod(denominator);
    match rounding {
        Rounding::Up if !r.is_zero() => Some(q + U256::one()),
        _ => Some(q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_by_zero_returns_none() {
        assert_eq!(div_round(100, 0, Rounding::Down), None);
        assert_eq!(div_round(0, 0, Rounding::Up), None);
        assert_eq!(div_round_u256(U256::one(), U256::zero(), Rounding::Up), None);
    }

    #[test]
    fn zero_numerator() {
        assert_eq!(div_round(0, 5, Rounding::Down), Some(0));
        assert_eq!(div_round(0, 5, Rounding::Up), Some(0));
    }

    #[test]
    fn exact_division_agrees() {
        assert_eq!(div_round(100, 10, Rounding::Down), Some(10));
        assert_eq!(div_round(100, 10, Rounding::Up), Some(10));
    }

    #[test]
    fn remainder_rounds_by_direction() {
        assert_eq!(div_round(9, 10, Rounding::Down), Some(0));
        assert_eq!(div_round(9, 10, Rounding::Up), Some(1));
        assert_eq!(div_round(1, u128::MAX, Rounding::Up), Some(1));
    }

    #[test]
    fn max_values() {
        assert_eq!(div_round(u128::MAX, 1, Rounding::Up), Some(u128::MAX));
        assert_eq!(div_round(u128::MAX, 2, Rounding::Up), Some(u128::MAX / 2 + 1));
        let d = u128::MAX / 2;
        assert_eq!(div_round(u128::MAX, d, Rounding::Down), Some(2));
        assert_eq!(div_round(u128::MAX, d, Rounding::Up), Some(3));
    }

    #[test]
    fn u256_rounding() {
        let n = U256::from(10u8);
        let d = U256::from(3u8);
        assert_eq!(div_round_u256(n, d, Rounding::Down), Some(U256::from(3u8)));
        assert_eq!(div_round_u256(n, d, Rounding::Up), Some(U256::from(4u8)));
        assert_eq!(div_round_u256(U256::MAX, U256::one(), Rounding::Up), Some(U256::MAX));
    }
}
