use clap::{Parser, Subcommand};
use config::Contract;
use indexer::{
    build_factory,
    config::Config,
    metrics::{install_prometheus_exporter, Metrics},
    scan_deposits, sorted_deposits,
};
use std::{path::PathBuf, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "indexer", about = "Scan L1 bridge contracts for deposits")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "indexer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the deposits initiated within a block range as JSON
    Scan {
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
    },
    /// Print the state batches appended within a block range as JSON
    Batches {
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
    },
    /// Print the contract addresses of the configured network
    Addresses,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Loading config: {}", cli.config.display());
    let config = Config::from_file(&cli.config)?;

    info!("Loaded config:");
    info!("  L1 RPC URL: {}", config.l1_rpc_url);
    info!("  Network: {}", config.network_id);

    if let Some(listener) = config.metrics_listener() {
        install_prometheus_exporter(listener)?;
        info!("Serving metrics on {}", listener);
    }
    let metrics = Metrics::new();

    let factory = build_factory(&config)?;

    let context = CancellationToken::new();
    let shutdown = context.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight queries");
            shutdown.cancel();
        }
    });

    match cli.command {
        Command::Scan { from, to } => {
            let provider = client::create_provider(&config.l1_rpc_url)?;
            let bridges = factory.bridges_for_network(config.network_id, provider, context)?;
            if bridges.is_empty() {
                warn!(network = config.network_id, "No bridges to scan");
            }

            let started = Instant::now();
            let result = scan_deposits(&bridges, from, to).await;
            metrics.record_scan("deposits", result.is_ok(), started.elapsed());

            let deposits = sorted_deposits(result?);
            info!(deposits = deposits.len(), "Scan complete");
            println!("{}", serde_json::to_string_pretty(&deposits)?);
        }
        Command::Batches { from, to } => {
            let provider = client::create_provider(&config.l1_rpc_url)?;
            let chain = factory.state_commitment_chain(config.network_id, provider, context)?;

            let started = Instant::now();
            let result = chain.get_state_batches_by_block_range(from, to).await;
            metrics.record_scan("state_batches", result.is_ok(), started.elapsed());

            let batches = result?;
            info!(batches = batches.len(), "Scan complete");
            println!("{}", serde_json::to_string_pretty(&batches)?);
        }
        Command::Addresses => {
            let book = factory.address_book();
            for contract in Contract::ALL {
                let layer = contract.layer();
                let address = book.resolve(config.network_id, layer, contract)?;
                println!("{layer} {:<36} {address}", contract.name());
            }
        }
    }

    Ok(())
}
