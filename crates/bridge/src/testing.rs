//! In-memory log source for tests.
//!
//! [`MemoryLogs`] answers log filters from a list of pre-recorded logs and
//! can be told to fail the next few queries, which is enough to exercise the
//! retry engine and the bridge adapters without a node.

use crate::filterer::LogFilterer;
use alloy_primitives::{Address, B256};
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::SolEvent;
use alloy_transport::{TransportErrorKind, TransportResult};
use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

#[derive(Debug, Default)]
struct State {
    logs: Vec<Log>,
    failures: VecDeque<String>,
    requests: Vec<Filter>,
}

/// Cloneable handle to a shared in-memory log store.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogs {
    state: Arc<Mutex<State>>,
}

impl MemoryLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` as emitted by `address` in the given block and transaction.
    pub fn push_event<E: SolEvent>(
        &self,
        address: Address,
        event: &E,
        block_number: u64,
        tx_hash: B256,
        log_index: u64,
    ) {
        let log = Log {
            inner: alloy_primitives::Log {
                address,
                data: event.encode_log_data(),
            },
            block_number: Some(block_number),
            transaction_hash: Some(tx_hash),
            log_index: Some(log_index),
            ..Default::default()
        };
        self.push_log(log);
    }

    pub fn push_log(&self, log: Log) {
        self.state.lock().unwrap().logs.push(log);
    }

    /// Fail the next `count` queries with `message`.
    pub fn fail_next(&self, count: usize, message: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .failures
            .extend(std::iter::repeat_n(message.to_string(), count));
    }

    /// Filters received so far, failed ones included.
    pub fn requests(&self) -> Vec<Filter> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

fn matches(filter: &Filter, log: &Log) -> bool {
    let block = log.block_number.unwrap_or_default();
    let after_start = filter.get_from_block().is_none_or(|from| block >= from);
    let before_end = filter.get_to_block().is_none_or(|to| block <= to);
    let topic0 = log.inner.data.topics().first();

    after_start
        && before_end
        && filter.address.matches(&log.inner.address)
        && topic0.is_some_and(|topic| filter.topics[0].matches(topic))
}

#[async_trait]
impl LogFilterer for MemoryLogs {
    async fn filter_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(filter.clone());

        if let Some(message) = state.failures.pop_front() {
            return Err(TransportErrorKind::custom_str(&message));
        }

        Ok(state
            .logs
            .iter()
            .filter(|log| matches(filter, log))
            .cloned()
            .collect())
    }
}
