//! Native ether deposits through the `L1StandardBridge`.

use crate::{
    adapter::{check_block_range, index_deposits, Bridge, BridgeKind},
    error::BridgeError,
    filter::{filter_eth_deposit_initiated_with_retry, FilterOpts, RetryPolicy},
    filterer::{L1StandardBridgeFilterer, LogFilterer},
    types::{Asset, Deposit, DepositIndex},
};
use alloy_primitives::Address;
use async_trait::async_trait;
use binding::l1bridge::IL1StandardBridge::ETHDepositInitiated;
use std::{fmt, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Scans `ETHDepositInitiated` events.
pub struct EthBridge<C> {
    context: CancellationToken,
    address: Address,
    filterer: Arc<L1StandardBridgeFilterer<C>>,
    policy: RetryPolicy,
}

impl<C: LogFilterer> EthBridge<C> {
    pub fn new(
        context: CancellationToken,
        filterer: Arc<L1StandardBridgeFilterer<C>>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            context,
            address: filterer.address(),
            filterer,
            policy,
        }
    }
}

#[async_trait]
impl<C: LogFilterer> Bridge for EthBridge<C> {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_deposits_by_block_range(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<DepositIndex, BridgeError> {
        check_block_range(from_block, to_block)?;

        let opts = FilterOpts::new(from_block, Some(to_block), self.context.clone());
        let logs =
            filter_eth_deposit_initiated_with_retry(&self.filterer, &opts, &self.policy).await?;

        debug!(
            bridge = %self.address,
            from = from_block,
            to = to_block,
            logs = logs.len(),
            "Fetched ETH deposit logs"
        );

        index_deposits::<ETHDepositInitiated>(BridgeKind::Eth, &logs, |event, meta| Deposit {
            tx_hash: meta.tx_hash,
            block_number: meta.block_number,
            log_index: meta.log_index,
            asset: Asset::Native,
            from: event._from,
            to: event._to,
            amount: event._amount,
            data: event._data,
        })
    }
}

impl<C> fmt::Debug for EthBridge<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthBridge")
            .field("address", &self.address)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
