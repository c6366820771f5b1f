pub mod config;
pub mod metrics;

use bridge::{merge_deposits, Bridge, BridgeError, BridgeFactory, Deposit, DepositIndex};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

/// Bridge factory for the configured address book and retry policy.
pub fn build_factory(config: &Config) -> eyre::Result<BridgeFactory> {
    let book = config.address_book()?;
    Ok(BridgeFactory::new(Arc::new(book)).with_retry_policy(config.retry_policy()))
}

/// Scan every bridge over `from_block..=to_block` and merge the results.
///
/// Bridges are scanned one after the other; the first failure aborts the
/// scan.
pub async fn scan_deposits(
    bridges: &[Box<dyn Bridge>],
    from_block: u64,
    to_block: u64,
) -> Result<DepositIndex, BridgeError> {
    let mut index = DepositIndex::new();

    for bridge in bridges {
        let deposits = bridge
            .get_deposits_by_block_range(from_block, to_block)
            .await?;
        info!(
            bridge = ?bridge,
            transactions = deposits.len(),
            "Scanned bridge"
        );
        merge_deposits(&mut index, deposits);
    }

    Ok(index)
}

/// Flatten `index` into chain order.
pub fn sorted_deposits(index: DepositIndex) -> Vec<Deposit> {
    let mut deposits: Vec<Deposit> = index.into_values().flatten().collect();
    deposits.sort_by_key(|d| (d.block_number, d.log_index));
    deposits
}
