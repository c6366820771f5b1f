//! ERC20 deposits through the `L1StandardBridge`.

use crate::{
    adapter::{check_block_range, index_deposits, Bridge, BridgeKind},
    error::BridgeError,
    filter::{filter_erc20_deposit_initiated_with_retry, FilterOpts, RetryPolicy},
    filterer::{L1StandardBridgeFilterer, LogFilterer},
    types::{Asset, Deposit, DepositIndex},
};
use alloy_primitives::Address;
use async_trait::async_trait;
use binding::l1bridge::IL1StandardBridge::ERC20DepositInitiated;
use std::{fmt, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Scans `ERC20DepositInitiated` events.
pub struct StandardBridge<C> {
    context: CancellationToken,
    address: Address,
    filterer: Arc<L1StandardBridgeFilterer<C>>,
    policy: RetryPolicy,
}

impl<C: LogFilterer> StandardBridge<C> {
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
impl<C: LogFilterer> Bridge for StandardBridge<C> {
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
            filter_erc20_deposit_initiated_with_retry(&self.filterer, &opts, &self.policy).await?;

        debug!(
            bridge = %self.address,
            from = from_block,
            to = to_block,
            logs = logs.len(),
            "Fetched ERC20 deposit logs"
        );

        index_deposits::<ERC20DepositInitiated>(BridgeKind::Standard, &logs, |event, meta| {
            Deposit {
                tx_hash: meta.tx_hash,
                block_number: meta.block_number,
                log_index: meta.log_index,
                asset: Asset::Token {
                    l1_token: event._l1Token,
                    l2_token: event._l2Token,
                },
                from: event._from,
                to: event._to,
                amount: event._amount,
                data: event._data,
            }
        })
    }
}

impl<C> fmt::Debug for StandardBridge<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardBridge")
            .field("address", &self.address)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
