//! Swap building example (DAI → USDC → WETH through two pools).
//!
//! Demonstrates turning a router's answer into a vault `batchSwap` with
//! slippage limits, the equivalent single `swap` for a one-hop route, and
//! how a caller checks settled deltas against those limits, then encodes a
//! two-pool flash swap.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=balancer_pool_core=debug cargo run --example batch_swap
//! ```

use balancer_pool_core::config::{Network, NetworkConfig};
use balancer_pool_core::domain::{Address, Amount, PoolId, SlippageTolerance};
use balancer_pool_core::swaps::{
    BuildSwapParams, CallDataEncoder, Route, RouteStep, SimpleFlashSwap, SwapBuilder, SwapCall,
    SwapFunction, SwapKind, Swaps,
};
use tracing_subscriber::EnvFilter;

const E18: u128 = 1_000_000_000_000_000_000;

/// Writes the selector followed by a debug dump of the arguments.
///
/// Stands in for a real ABI encoder.
struct SelectorOnly;

impl CallDataEncoder for SelectorOnly {
    type Error = std::convert::Infallible;

    fn encode(&self, function: SwapFunction, call: &SwapCall) -> Result<Vec<u8>, Self::Error> {
        let mut data = function.selector().to_vec();
        data.extend_from_slice(format!("{call:?}").as_bytes());
        Ok(data)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "balancer_pool_core=info".into()),
        )
        .init();

    println!("=== Vault swaps: limits and encodings ===\n");

    let network = NetworkConfig::for_network(Network::Mainnet)?;
    let swaps = Swaps::new(network);
    let dai: Address = "0x6b175474e89094c44da98b954eedeac495271d0f".parse()?;
    let usdc: Address = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".parse()?;
    let weth = network.wrapped_native_asset();
    let trader: Address = "0x1111111111111111111111111111111111111111".parse()?;
    let stable_pool: PoolId =
        "0x06df3b2bbb68adc8b0e302443692037ed9f91b42000000000000000000000063".parse()?;
    let weighted_pool: PoolId =
        "0x96646936b91d6b9d7d0c47c496afbf3d6ec7b6f8000200000000000000000019".parse()?;

    // ── 1. A two-hop route as a router would return it ──────────────────
    //    20 000 DAI → ~20 000 USDC → ~10 WETH. The second step has amount 0
    //    so the vault chains the first step's output into it.
    let route = Route::new(
        SwapKind::GivenIn,
        dai,
        weth,
        Amount::new(20_000 * E18),
        Amount::new(10 * E18),
        vec![
            RouteStep::new(stable_pool, dai, usdc, Amount::new(20_000 * E18)),
            RouteStep::new(weighted_pool, usdc, weth, Amount::ZERO),
        ],
        vec![dai, usdc, weth],
    )?;
    println!("Route: {} steps over {} assets", route.steps().len(), route.assets().len());
    println!("  Deltas:  {:?}", route.deltas()?);

    // ── 2. batchSwap with 0.5% slippage ─────────────────────────────────
    let tolerance = SlippageTolerance::new(50)?;
    let tx = swaps.build_swap(BuildSwapParams {
        sender: trader,
        recipient: trader,
        route,
        deadline: 1_900_000_000,
        max_slippage: tolerance,
    })?;
    println!("\n--- Two-hop swap ---");
    println!("  Target:    {}", tx.to());
    println!("  Function:  {}", tx.function());
    println!("  Limits:    {:?}", tx.asset_limits());
    if let SwapCall::Batch { swaps: steps, .. } = &tx.attributes().call {
        for step in steps {
            println!(
                "  Step:      {} -> {} via {} (amount {})",
                step.asset_in_index, step.asset_out_index, step.pool_id, step.amount
            );
        }
    }
    let data = tx.data(&SelectorOnly)?;
    let selector = hex::encode(data.get(..4).unwrap_or_default());
    println!("  Calldata:  0x{selector}... ({} bytes)", data.len());

    // ── 3. Checking a settlement against the limits ─────────────────────
    //    The vault pays out 9.97 WETH: inside the 0.5% band.
    let settled = [20_000 * E18 as i128, 0, -(9_970_000_000_000_000_000_i128)];
    match Swaps::check_limits(&settled, tx.asset_limits()) {
        Ok(()) => println!("\n  Settlement of 9.97 WETH accepted"),
        Err(e) => println!("\n  Settlement rejected: {e}"),
    }
    let settled = [20_000 * E18 as i128, 0, -(9_900_000_000_000_000_000_i128)];
    match Swaps::check_limits(&settled, tx.asset_limits()) {
        Ok(()) => println!("  Settlement of 9.90 WETH accepted"),
        Err(e) => println!("  Settlement of 9.90 WETH rejected: {e}"),
    }

    // ── 4. One hop: single swap vs forced batch ─────────────────────────
    let one_hop = Route::new(
        SwapKind::GivenOut,
        usdc,
        weth,
        Amount::new(10 * E18),
        Amount::new(20_050_000_000),
        vec![RouteStep::new(weighted_pool, usdc, weth, Amount::new(10 * E18))],
        vec![usdc, weth],
    )?;
    let single = SwapBuilder::new(one_hop.clone(), &network)?
        .set_funds(trader, trader)
        .set_deadline(1_900_000_000)
        .set_limits(tolerance)
        .build()?;
    let batch = SwapBuilder::batch(one_hop, &network)?
        .set_funds(trader, trader)
        .set_deadline(1_900_000_000)
        .set_limits(tolerance)
        .build()?;
    println!("\n--- Exact-out one-hop: 10 WETH for at most ~20 150 USDC ---");
    println!("  {}: limits {:?}", single.function(), single.asset_limits());
    println!("  {}: limits {:?}", batch.function(), batch.asset_limits());
    if let SwapCall::Single { limit, .. } = &single.attributes().call {
        println!("  Single-swap max in: {limit}");
    }

    // ── 5. Flash swap: DAI → USDC → DAI across both pools ───────────────
    let flash = SimpleFlashSwap::new(
        Amount::new(1_000_000 * E18),
        &[stable_pool, weighted_pool],
        &[dai, usdc],
        trader,
    )?;
    let attributes = swaps.build_simple_flash_swap(&flash);
    println!("\n--- Simple flash swap: borrow 1M DAI ---");
    println!("  {}: limits {:?}", attributes.function, attributes.asset_limits);
    let data = Swaps::encode_simple_flash_swap(&flash, &SelectorOnly)?;
    println!("  Calldata:  {} bytes", data.len());

    println!("\n=== Done ===");
    Ok(())
}
