/// Example monitoring loop over an on-chain redemption-rate oracle
///
/// Wires a [`PriceFeed`] against a live Ethereum RPC endpoint and an
/// oracle relay contract, then:
/// 1. Refreshes the current price at the chain head
/// 2. Resolves the block closest to one hour ago and samples the price there
/// 3. Prints the block cache statistics accumulated along the way
///
/// Run with:
/// ```bash
/// ETHEREUM_RPC_URL=https://eth.llamarpc.com \
/// ORACLE_RELAY_ADDRESS=0x4ed7c70F96B99c776995fB64377f0d4aB3B0e1C1 \
/// cargo run --example feed_monitor
/// ```
use alloy_primitives::Address;
use alloy_provider::ProviderBuilder;
use anyhow::{Context, Result};
use oraclefeed::{
    AlloyLedger, BlockFinder, OracleRelaySampler, PriceFeed, RedemptionRateTransform, SystemClock,
    UnixTimestamp,
};
use std::env;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const ONE_HOUR_SECS: u64 = 3_600;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let rpc_url =
        env::var("ETHEREUM_RPC_URL").unwrap_or_else(|_| "https://eth.llamarpc.com".to_string());
    let relay: Address = env::var("ORACLE_RELAY_ADDRESS")
        .context("ORACLE_RELAY_ADDRESS must be set to the oracle relay contract address")?
        .parse()
        .context("ORACLE_RELAY_ADDRESS is not a valid address")?;

    info!(rpc_url, relay = %relay, "Connecting to Ethereum mainnet");

    let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);

    let ledger = Arc::new(AlloyLedger::new(provider.clone()));
    let finder = Arc::new(BlockFinder::new(ledger));

    let feed = PriceFeed::new(
        Arc::clone(&finder),
        Box::new(OracleRelaySampler::new(relay, provider)),
        Box::new(RedemptionRateTransform),
        Box::new(SystemClock),
    )
    .with_id(format!("OracleRelay-{relay}"));

    println!("\n=== Oracle Feed Monitor ({}) ===\n", feed.id());

    feed.refresh().await;
    match feed.current_price() {
        Some(price) => println!(
            "Current price: {price:.6} ({} decimals, updated at {})",
            feed.decimals(),
            feed.last_update_time()
                .map(|t| t.to_string())
                .unwrap_or_default(),
        ),
        None => println!("Current price unavailable; see log output above"),
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?
        .as_secs();
    let an_hour_ago = UnixTimestamp(now - ONE_HOUR_SECS);

    info!(at = %an_hour_ago, "Resolving historical price");
    let historical = feed.historical_price(an_hour_ago).await?;
    println!("Price one hour ago: {historical:.6}");

    let stats = finder.cache_stats().await;
    println!("\nBlock cache: {stats}");

    Ok(())
}
