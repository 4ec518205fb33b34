//! Property-based tests using `proptest` for pool-math invariants.
//!
//! 1. **Join/exit round trip**: joining then exiting never returns more
//!    than was deposited.
//! 2. **Price impact range**: every computed price impact lies in `[0, 1]`.
//! 3. **Proportional joins**: amounts in pool proportions have no impact.
//! 4. **Stable invariant bounds**: `2·√(xy) <= D <= x + y`.
//! 5. **Spot price direction**: a deeper `token_in` side raises the price
//!    quoted in `token_in` per `token_out`.
//! 6. **Linear nominal round trip**: `from_nominal(to_nominal(x)) ≈ x`.

use proptest::prelude::*;

use super::linear_math::NominalCurve;
use super::{stable_math, StableConcerns, WeightedConcerns};
use crate::domain::{
    Amount, Decimals, ExitKind, ExitRequest, JoinKind, JoinRequest, PoolSnapshot, PoolToken,
    SlippageTolerance,
};
use crate::math::FixedPoint;
use crate::pools::common::tests::{addr, e18, fp, mainnet, pool_id, token};
use crate::traits::{ExitConcern, JoinConcern, SpotPriceConcern};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn weighted(b0: Amount, b1: Amount, supply: Amount) -> PoolSnapshot {
    PoolSnapshot::new(
        pool_id(0x77),
        "Weighted",
        vec![
            PoolToken::new(addr(1), b0, Decimals::MAX).with_weight(fp("0.5")),
            PoolToken::new(addr(2), b1, Decimals::MAX).with_weight(fp("0.5")),
        ],
        fp("0.003"),
        supply,
    )
}

fn stable(b0: Amount, b1: Amount, supply: Amount, amp: u64) -> PoolSnapshot {
    PoolSnapshot::new(
        pool_id(0x78),
        "Stable",
        vec![
            PoolToken::new(addr(1), b0, Decimals::MAX),
            PoolToken::new(addr(2), b1, Decimals::MAX),
        ],
        fp("0.0004"),
        supply,
    )
    .with_amp(amp)
}

fn join_request(amounts: Vec<Amount>) -> JoinRequest {
    let Ok(kind) = JoinKind::exact_tokens_in(amounts) else {
        panic!("kind");
    };
    JoinRequest::new(
        addr(0xa0),
        addr(0xa0),
        vec![addr(1), addr(2)],
        kind,
        SlippageTolerance::ZERO,
    )
}

fn exit_request(bpt_in: Amount) -> ExitRequest {
    let Ok(kind) = ExitKind::proportional(bpt_in) else {
        panic!("kind");
    };
    ExitRequest::new(addr(0xa0), addr(0xa0), kind, SlippageTolerance::ZERO)
}

fn add(a: Amount, b: Amount) -> Amount {
    Amount::new(a.get() + b.get())
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Whole-token reserves in [1_000, 10_000_000].
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000u128..=10_000_000u128
}

/// Amplification values in [1, 5_000].
fn amplification_strategy() -> impl Strategy<Value = u64> {
    1u64..=5_000u64
}

/// Deposit as a fraction of the reserve, in per-mille [1, 500].
fn per_mille_strategy() -> impl Strategy<Value = u128> {
    1u128..=500u128
}

// ---------------------------------------------------------------------------
// Property 1: Join/exit round trip favours the pool
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_weighted(reserve in reserve_strategy(), per_mille in per_mille_strategy()) {
        let concerns = WeightedConcerns::new(mainnet());
        let balance = e18(reserve);
        let deposit = Amount::new(balance.get() / 1000 * per_mille);
        let snapshot = weighted(balance, balance, e18(2 * reserve));
        let Ok(joined) = concerns.join(&snapshot, &join_request(vec![deposit, deposit])) else {
            panic!("join");
        };
        let bpt = joined.expected_bpt_out();
        let after = weighted(add(balance, deposit), add(balance, deposit), add(e18(2 * reserve), bpt));
        let Ok(exited) = concerns.exit(&after, &exit_request(bpt)) else {
            panic!("exit");
        };
        for out in exited.expected_amounts_out() {
            prop_assert!(*out <= deposit, "withdrew {} of {} deposited", out, deposit);
        }
    }

    #[test]
    fn prop_round_trip_stable(
        reserve in reserve_strategy(),
        per_mille in per_mille_strategy(),
        amp in amplification_strategy(),
    ) {
        let concerns = StableConcerns::new(mainnet());
        let balance = e18(reserve);
        let deposit = Amount::new(balance.get() / 1000 * per_mille);
        let snapshot = stable(balance, balance, e18(2 * reserve), amp);
        let Ok(joined) = concerns.join(&snapshot, &join_request(vec![deposit, deposit])) else {
            panic!("join");
        };
        let bpt = joined.expected_bpt_out();
        let after = stable(add(balance, deposit), add(balance, deposit), add(e18(2 * reserve), bpt), amp);
        let Ok(exited) = concerns.exit(&after, &exit_request(bpt)) else {
            panic!("exit");
        };
        for out in exited.expected_amounts_out() {
            prop_assert!(*out <= deposit, "withdrew {} of {} deposited", out, deposit);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Price impact stays in [0, 1]
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_price_impact_in_range_weighted(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        deposit in 1u128..=100_000_000u128,
    ) {
        let snapshot = weighted(e18(r0), e18(r1), e18(r0 + r1));
        let concerns = WeightedConcerns::new(mainnet());
        let Ok(result) = concerns.join(&snapshot, &join_request(vec![e18(deposit), Amount::ZERO])) else {
            panic!("join");
        };
        prop_assert!(result.price_impact() <= FixedPoint::ONE);
    }

    #[test]
    fn prop_price_impact_in_range_stable(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        deposit in 1u128..=1_000_000u128,
        amp in amplification_strategy(),
    ) {
        let snapshot = stable(e18(r0), e18(r1), e18(r0 + r1), amp);
        let concerns = StableConcerns::new(mainnet());
        let Ok(result) = concerns.join(&snapshot, &join_request(vec![Amount::ZERO, e18(deposit)])) else {
            panic!("join");
        };
        prop_assert!(result.price_impact() <= FixedPoint::ONE);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Proportional amounts carry no price impact
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_proportional_join_has_no_impact(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        per_mille in per_mille_strategy(),
        amp in amplification_strategy(),
    ) {
        let (b0, b1) = (e18(r0), e18(r1));
        let amounts = vec![
            Amount::new(b0.get() / 1000 * per_mille),
            Amount::new(b1.get() / 1000 * per_mille),
        ];
        let snapshot = stable(b0, b1, e18(r0 + r1), amp);
        let Ok(result) = StableConcerns::new(mainnet()).join(&snapshot, &join_request(amounts)) else {
            panic!("join");
        };
        prop_assert!(result.price_impact() < fp("0.000001"), "impact {}", result.price_impact());
    }
}

// ---------------------------------------------------------------------------
// Property 4: Stable invariant bounds
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_stable_invariant_bounds(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        amp in amplification_strategy(),
    ) {
        let (x, y) = (FixedPoint::from_integer(r0), FixedPoint::from_integer(r1));
        let Ok(d) = stable_math::calculate_invariant(amp, &[x, y]) else {
            panic!("invariant should converge");
        };
        let sum = FixedPoint::from_integer(r0 + r1);
        let Ok(product) = x.mul_down(y) else {
            panic!("product");
        };
        let Ok(lower) = product.sqrt().mul_down(FixedPoint::from_integer(2)) else {
            panic!("bound");
        };
        prop_assert!(d.saturating_sub(sum) <= FixedPoint::from_raw_u128(1_000_000), "D {} above sum {}", d, sum);
        prop_assert!(d >= lower.saturating_sub(FixedPoint::from_raw_u128(1_000_000)), "D {} below {}", d, lower);
    }
}

// ---------------------------------------------------------------------------
// Property 5: Spot price direction
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_more_token_in_raises_its_price(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        extra in 1u128..=1_000_000u128,
    ) {
        let concerns = WeightedConcerns::new(mainnet());
        let before = weighted(e18(r0), e18(r1), e18(r0 + r1));
        let after = weighted(e18(r0 + extra), e18(r1), e18(r0 + r1));
        let (Ok(p0), Ok(p1)) = (
            concerns.spot_price(&before, addr(1), addr(2)),
            concerns.spot_price(&after, addr(1), addr(2)),
        ) else {
            panic!("price");
        };
        prop_assert!(p1 > p0, "{} then {}", p0, p1);
    }
}

// ---------------------------------------------------------------------------
// Property 6: Linear nominal round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_linear_nominal_round_trip(real in 500_000u128..=5_000_000u128, fee_bps in 0u128..=1_000u128) {
        let fee = FixedPoint::from_raw_u128(fee_bps * 100_000_000_000_000);
        let Ok(curve) = NominalCurve::new(fee, FixedPoint::from_integer(1_000_000), FixedPoint::from_integer(2_000_000)) else {
            panic!("curve");
        };
        let real = FixedPoint::from_integer(real);
        let Ok(nominal) = curve.to_nominal(real) else {
            panic!("nominal");
        };
        let Ok(back) = curve.from_nominal(nominal) else {
            panic!("real");
        };
        let diff = if back > real { back.saturating_sub(real) } else { real.saturating_sub(back) };
        prop_assert!(diff <= FixedPoint::from_raw_u128(1_000_000), "{} -> {}", real, back);
    }
}

#[test]
fn helpers_build_valid_snapshots() {
    assert!(weighted(e18(1), e18(1), e18(2)).validate().is_ok());
    assert!(stable(e18(1), e18(1), e18(2), 100).validate().is_ok());
    assert_eq!(token(1, e18(1)).address(), addr(1));
}
