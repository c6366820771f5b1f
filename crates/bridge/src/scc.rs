//! State batches appended to the `StateCommitmentChain`.

use crate::{
    adapter::{check_block_range, decode_log},
    error::BridgeError,
    filter::{filter_state_batch_appended_with_retry, FilterOpts, RetryPolicy},
    filterer::{LogFilterer, StateCommitmentChainFilterer},
    types::StateBatch,
};
use alloy_primitives::Address;
use binding::scc::IStateCommitmentChain::StateBatchAppended;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Scans `StateBatchAppended` events.
pub struct StateCommitmentChain<C> {
    context: CancellationToken,
    filterer: StateCommitmentChainFilterer<C>,
    policy: RetryPolicy,
}

impl<C: LogFilterer> StateCommitmentChain<C> {
    pub const fn new(
        context: CancellationToken,
        filterer: StateCommitmentChainFilterer<C>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            context,
            filterer,
            policy,
        }
    }

    pub const fn address(&self) -> Address {
        self.filterer.address()
    }

    /// State batches appended within `from_block..=to_block`, in log order.
    pub async fn get_state_batches_by_block_range(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<StateBatch>, BridgeError> {
        check_block_range(from_block, to_block)?;

        let opts = FilterOpts::new(from_block, Some(to_block), self.context.clone());
        let logs =
            filter_state_batch_appended_with_retry(&self.filterer, &opts, &self.policy).await?;

        debug!(
            from = from_block,
            to = to_block,
            logs = logs.len(),
            "Fetched state batch logs"
        );

        logs.iter()
            .map(|log| {
                let (event, meta) = decode_log::<StateBatchAppended>(log)?;
                Ok(StateBatch {
                    batch_index: event._batchIndex,
                    batch_root: event._batchRoot,
                    batch_size: event._batchSize,
                    prev_total_elements: event._prevTotalElements,
                    extra_data: event._extraData,
                    tx_hash: meta.tx_hash,
                    block_number: meta.block_number,
                })
            })
            .collect()
    }
}

impl<C> fmt::Debug for StateCommitmentChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCommitmentChain")
            .field("filterer", &self.filterer)
            .field("policy", &self.policy)
            .finish()
    }
}
