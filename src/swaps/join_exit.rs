//! Detection of routes that join or exit pools along the path.
//!
//! A router may route through a weighted pool's BPT, joining the pool on
//! one hop and exiting it on another. The vault cannot execute such hops
//! as plain swaps; they must go through a relayer, which this crate does
//! not build for.

use super::route::{Route, SwapKind};
use crate::domain::{Address, PoolSnapshot, PoolType};

/// Whether the router may be asked for join/exit paths.
///
/// Relayer routes only support given-in swaps without the native asset.
///
/// ```
/// use balancer_pool_core::domain::Address;
/// use balancer_pool_core::swaps::{can_use_join_exit, SwapKind};
///
/// let dai = Address::from_bytes([1; 20]);
/// assert!(!can_use_join_exit(SwapKind::GivenIn, Address::ZERO, dai));
/// ```
#[must_use]
pub fn can_use_join_exit(kind: SwapKind, token_in: Address, token_out: Address) -> bool {
    kind == SwapKind::GivenIn && !token_in.is_native() && !token_out.is_native()
}

/// Whether any step of `route` joins or exits one of `pools`.
///
/// A step is a join or exit when it trades a weighted pool's own BPT
/// against that pool. Steps over pools missing from `pools` are treated as
/// plain swaps.
#[must_use]
pub fn some_join_exit(pools: &[PoolSnapshot], route: &Route) -> bool {
    route.steps().iter().any(|step| {
        pools
            .iter()
            .find(|pool| pool.id() == step.pool_id)
            .is_some_and(|pool| {
                matches!(pool.kind(), Ok(PoolType::Weighted))
                    && (step.token_in == pool.address() || step.token_out == pool.address())
            })
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Decimals, PoolId, PoolToken};
    use crate::math::FixedPoint;
    use crate::swaps::RouteStep;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn pool(byte: u8, tag: &str) -> PoolSnapshot {
        PoolSnapshot::new(
            PoolId::from_bytes([byte; 32]),
            tag,
            vec![
                PoolToken::new(addr(1), Amount::new(1), Decimals::MAX),
                PoolToken::new(addr(2), Amount::new(1), Decimals::MAX),
            ],
            FixedPoint::ZERO,
            Amount::new(1),
        )
    }

    fn route_through(pool: &PoolSnapshot, token_in: Address, token_out: Address) -> Route {
        let Ok(route) = Route::new(
            SwapKind::GivenIn,
            token_in,
            token_out,
            Amount::new(10),
            Amount::new(10),
            vec![RouteStep::new(pool.id(), token_in, token_out, Amount::new(10))],
            vec![token_in, token_out],
        ) else {
            panic!("valid route");
        };
        route
    }

    #[test]
    fn given_out_and_native_routes_cannot_join_exit() {
        assert!(can_use_join_exit(SwapKind::GivenIn, addr(1), addr(2)));
        assert!(!can_use_join_exit(SwapKind::GivenOut, addr(1), addr(2)));
        assert!(!can_use_join_exit(SwapKind::GivenIn, addr(1), Address::ZERO));
    }

    #[test]
    fn weighted_bpt_hop_is_a_join() {
        let weighted = pool(5, "Weighted");
        let route = route_through(&weighted, addr(1), weighted.address());
        assert!(some_join_exit(&[weighted], &route));
    }

    #[test]
    fn plain_hop_and_other_families_are_swaps() {
        let weighted = pool(5, "Weighted");
        assert!(!some_join_exit(
            std::slice::from_ref(&weighted),
            &route_through(&weighted, addr(1), addr(2))
        ));
        let stable = pool(6, "Stable");
        let route = route_through(&stable, addr(1), stable.address());
        assert!(!some_join_exit(&[stable], &route));
        assert!(!some_join_exit(&[], &route));
    }
}
