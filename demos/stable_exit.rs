//! Stable-family example (DAI/USDC/USDT 3pool and a composable variant).
//!
//! Demonstrates exits of every kind against a stable pool, the effect of
//! the amplification parameter on price impact, and the way a composable
//! stable pool hides its own BPT from amounts and user data.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=balancer_pool_core=trace cargo run --example stable_exit
//! ```

use balancer_pool_core::config::{Network, NetworkConfig};
use balancer_pool_core::domain::{
    Address, Amount, Decimals, ExitKind, ExitRequest, PoolId, PoolSnapshot, PoolToken,
    SlippageTolerance,
};
use balancer_pool_core::factory::PoolTypeConcerns;
use balancer_pool_core::traits::{ExitConcern, PriceImpactConcern};
use tracing_subscriber::EnvFilter;

const E18: u128 = 1_000_000_000_000_000_000;

fn three_pool(tag: &str, amp: u64, id: PoolId) -> Result<PoolSnapshot, Box<dyn std::error::Error>> {
    let dai: Address = "0x6b175474e89094c44da98b954eedeac495271d0f".parse()?;
    let usdc: Address = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".parse()?;
    let usdt: Address = "0xdac17f958d2ee523a2206206994597c13d831ec7".parse()?;
    let six = Decimals::new(6)?;
    let mut tokens = vec![
        PoolToken::new(dai, Amount::new(10_000_000 * E18), Decimals::MAX),
        PoolToken::new(usdc, Amount::new(10_000_000_000_000), six),
        PoolToken::new(usdt, Amount::new(8_000_000_000_000), six),
    ];
    if tag == "ComposableStable" {
        tokens.push(PoolToken::new(
            id.address(),
            Amount::new(2_596_148_429_267_413 * E18),
            Decimals::MAX,
        ));
    }
    let pool = PoolSnapshot::new(id, tag, tokens, "0.0001".parse()?, Amount::new(27_900_000 * E18))
        .with_amp(amp);
    pool.validate()?;
    Ok(pool)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "balancer_pool_core=info".into()),
        )
        .init();

    println!("=== Stable Pools: exits ===\n");

    let network = NetworkConfig::for_network(Network::Mainnet)?;
    let id: PoolId = "0x06df3b2bbb68adc8b0e302443692037ed9f91b42000000000000000000000063".parse()?;
    let pool = three_pool("Stable", 2_000, id)?;
    let concerns = PoolTypeConcerns::resolve(pool.pool_type(), &network)?;
    let slippage = SlippageTolerance::new(10)?; // 0.1%
    let usdt = pool.tokens().get(2).map(PoolToken::address).ok_or("three tokens")?;

    // ── 1. Proportional exit ────────────────────────────────────────────
    let request = ExitRequest::new(
        Address::ZERO,
        Address::ZERO,
        ExitKind::proportional(Amount::new(10_000 * E18))?,
        slippage,
    );
    let result = concerns.exit(&pool, &request)?;
    println!("--- Proportional exit: 10 000 BPT ---");
    println!("  Amounts out:  {:?}", result.expected_amounts_out());
    println!("  Price impact: {}", result.price_impact());

    // ── 2. Exact tokens out ─────────────────────────────────────────────
    let request = ExitRequest::new(
        Address::ZERO,
        Address::ZERO,
        ExitKind::exact_tokens_out(vec![
            Amount::new(5_000 * E18),
            Amount::ZERO,
            Amount::new(5_000_000_000),
        ])?,
        slippage,
    );
    let result = concerns.exit(&pool, &request)?;
    println!("\n--- Exact out: 5 000 DAI + 5 000 USDT ---");
    println!("  Expected BPT in: {}", result.expected_bpt_in());
    println!("  Maximum BPT in:  {}", result.max_bpt_in());
    println!("  Price impact:    {}", result.price_impact());

    // ── 3. Single token, across amplification values ────────────────────
    println!("\n--- Single-token exit: 100 000 BPT for USDT ---");
    for amp in [10, 200, 2_000] {
        let pool = three_pool("Stable", amp, id)?;
        let request = ExitRequest::new(
            Address::ZERO,
            Address::ZERO,
            ExitKind::single_token(Amount::new(100_000 * E18), usdt)?,
            slippage,
        );
        let result = concerns.exit(&pool, &request)?;
        let out = result.expected_amounts_out().get(2).copied().unwrap_or(Amount::ZERO);
        println!("  amp {amp:>5}: {out} USDT units, impact {}", result.price_impact());
    }

    // ── 4. Price impact of a raw amount set ─────────────────────────────
    let impact = concerns.price_impact(
        &pool,
        &[Amount::new(1_000_000 * E18), Amount::ZERO, Amount::ZERO],
        Amount::ZERO,
        true,
    )?;
    println!("\n  Impact of joining with 1M DAI only: {impact}");

    // ── 5. Composable stable: BPT stays out of amounts ──────────────────
    let composable = three_pool("ComposableStable", 2_000, id)?;
    let concerns = PoolTypeConcerns::resolve(composable.pool_type(), &network)?;
    let request = ExitRequest::new(
        Address::ZERO,
        Address::ZERO,
        ExitKind::single_token(Amount::new(1_000 * E18), usdt)?,
        slippage,
    );
    let result = concerns.exit(&composable, &request)?;
    println!("\n--- Composable stable single-token exit ---");
    println!("  Call assets:  {} (BPT included)", result.call().assets.len());
    println!("  Amounts out:  {:?} (BPT excluded)", result.expected_amounts_out());
    println!("  User data:    {:?}", result.call().user_data);

    println!("\n=== Done ===");
    Ok(())
}
