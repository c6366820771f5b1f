//! Scans against a live L1 node.
//!
//! These tests require a test configuration file at `tests/test-config.toml`.
//!
//! Run with:
//! ```bash
//! cargo test --package indexer --test live -- --ignored
//! ```


use indexer::{build_factory, scan_deposits};
use setup::load_test_config;
use tokio_util::sync::CancellationToken;

#[tokio::test]
#[ignore = "requires a live L1 endpoint"]
async fn test_live_deposit_scan() {
    let config = load_test_config();

    println!("Testing deposit scan");
    println!("L1 RPC: {}", config.l1_rpc_url);
    println!("Network: {}", config.network_id);

    let provider = client::create_provider(&config.l1_rpc_url).expect("Failed to create provider");
    let bridges = build_factory(&config)
        .expect("Failed to build factory")
        .bridges_for_network(config.network_id, provider, CancellationToken::new())
        .expect("Failed to construct bridges");

    let index = scan_deposits(&bridges, 28_000_000, 28_000_100)
        .await
        .expect("Failed to scan deposits");

    println!("✓ Found deposits in {} transactions", index.len());
}
