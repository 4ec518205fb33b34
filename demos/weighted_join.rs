//! Weighted pool example (80/20 BAL/WETH style).
//!
//! Demonstrates resolving a weighted pool from its tag, quoting the spot
//! price, and comparing a balanced join with a single-sided one.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=balancer_pool_core=debug cargo run --example weighted_join
//! ```

use balancer_pool_core::config::{Network, NetworkConfig};
use balancer_pool_core::domain::{
    Address, Amount, Decimals, ExitKind, ExitRequest, JoinKind, JoinRequest, PoolId, PoolSnapshot,
    PoolToken, SlippageTolerance,
};
use balancer_pool_core::factory::PoolTypeConcerns;
use balancer_pool_core::math::FixedPoint;
use balancer_pool_core::traits::{ExitConcern, JoinConcern, LiquidityConcern, SpotPriceConcern};
use tracing_subscriber::EnvFilter;

const E18: u128 = 1_000_000_000_000_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "balancer_pool_core=info".into()),
        )
        .init();

    println!("=== Weighted Pool: joins and price impact ===\n");

    // ── 1. Network and tokens ───────────────────────────────────────────
    let network = NetworkConfig::for_network(Network::Mainnet)?;
    let bal: Address = "0xba100000625a3754423978a60c9317c58a424e3d".parse()?;
    let weth = network.wrapped_native_asset();
    println!("Vault:  {}", network.vault());
    println!("BAL:    {bal}");
    println!("WETH:   {weth}");

    // ── 2. Snapshot of an 80/20 pool ────────────────────────────────────
    //    1.6M BAL (80%) against 1 000 WETH (20%): BAL priced at 0.0025 WETH.
    let pool = PoolSnapshot::new(
        "0x5c6ee304399dbdb9c8ef030ab642b10820db8f56000200000000000000000014".parse::<PoolId>()?,
        "Weighted",
        vec![
            PoolToken::new(bal, Amount::new(1_600_000 * E18), Decimals::MAX)
                .with_weight("0.8".parse()?),
            PoolToken::new(weth, Amount::new(1_000 * E18), Decimals::MAX)
                .with_weight("0.2".parse()?),
        ],
        "0.01".parse()?,
        Amount::new(100_000 * E18),
    );
    pool.validate()?;
    let concerns = PoolTypeConcerns::resolve(pool.pool_type(), &network)?;
    println!("\nPool {} resolved as {}", pool.id(), concerns.pool_type());

    // ── 3. Spot price and liquidity ─────────────────────────────────────
    let price = concerns.spot_price(&pool, weth, bal)?;
    println!("  Spot price (WETH per BAL, fee included): {price}");
    let weth_usd: FixedPoint = "2000".parse()?;
    let liquidity = concerns.liquidity(&pool, &[None, Some(weth_usd)])?;
    println!("  Liquidity at 2000 USD/WETH:             {liquidity} USD");

    // ── 4. Balanced join: amounts in pool proportions ───────────────────
    let slippage = SlippageTolerance::new(50)?; // 0.5%
    let balanced = JoinRequest::new(
        Address::ZERO,
        Address::ZERO,
        vec![bal, weth],
        JoinKind::exact_tokens_in(vec![Amount::new(16_000 * E18), Amount::new(10 * E18)])?,
        slippage,
    );
    let result = concerns.join(&pool, &balanced)?;
    println!("\n--- Balanced join: 16 000 BAL + 10 WETH ---");
    println!("  Expected BPT:  {}", result.expected_bpt_out());
    println!("  Minimum BPT:   {}", result.min_bpt_out());
    println!("  Price impact:  {}", result.price_impact());

    // ── 5. Single-sided join pays the swap fee and moves the price ──────
    let single = JoinRequest::new(
        Address::ZERO,
        Address::ZERO,
        vec![bal, Address::ZERO],
        JoinKind::exact_tokens_in(vec![Amount::ZERO, Amount::new(100 * E18)])?,
        slippage,
    );
    let result = concerns.join(&pool, &single)?;
    println!("\n--- Single-sided join: 100 ETH (native) ---");
    println!("  Expected BPT:  {}", result.expected_bpt_out());
    println!("  Price impact:  {}", result.price_impact());
    println!("  Value sent:    {}", result.value());
    println!("  Assets:        {:?}", result.call().assets);

    // ── 6. Single-token exit ────────────────────────────────────────────
    let exit = ExitRequest::new(
        Address::ZERO,
        Address::ZERO,
        ExitKind::single_token(Amount::new(1_000 * E18), weth)?,
        slippage,
    );
    let result = concerns.exit(&pool, &exit)?;
    println!("\n--- Exit: 1 000 BPT for WETH ---");
    println!("  Expected out:  {:?}", result.expected_amounts_out());
    println!("  Minimum out:   {:?}", result.min_amounts_out());
    println!("  Price impact:  {}", result.price_impact());

    println!("\n=== Done ===");
    Ok(())
}
