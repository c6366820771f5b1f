//! Retry discipline for log queries.
//!
//! Remote log queries fail for transient reasons such as node timeouts or
//! rate limits. Every query issued by a bridge goes through [`retry_filter`]:
//!
//! - each attempt is bounded by [`RetryPolicy::connection_timeout`]
//! - a failed or timed out attempt is retried after [`RetryPolicy::retry_interval`]
//! - there is no attempt limit; the only way to stop is to cancel the
//!   [`FilterOpts::context`] token

use crate::filterer::{L1StandardBridgeFilterer, LogFilterer, StateCommitmentChainFilterer};
use alloy_rpc_types_eth::{Filter, Log};
use alloy_primitives::{Address, B256};
use metrics::counter;
use std::{fmt::Display, future::Future, time::Duration};
use thiserror::Error;
use tokio_retry::strategy::FixedInterval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Interval to wait between retrying client API calls.
pub const CLIENT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound for a single client API call.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("log query cancelled after {attempts} attempts")]
    Cancelled {
        attempts: u64,
        last_error: Option<String>,
    },
}

/// Fixed-interval retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between a failed attempt and the next one
    pub retry_interval: Duration,
    /// Timeout applied to every single attempt
    pub connection_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_interval: CLIENT_RETRY_INTERVAL,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

/// Block range and cancellation context of a log query.
#[derive(Debug, Clone)]
pub struct FilterOpts {
    pub start: u64,
    /// `None` queries up to the latest block
    pub end: Option<u64>,
    pub context: CancellationToken,
}

impl FilterOpts {
    pub const fn new(start: u64, end: Option<u64>, context: CancellationToken) -> Self {
        Self {
            start,
            end,
            context,
        }
    }

    /// Log filter for `event` emitted by `address` within the block range.
    pub fn filter(&self, address: Address, event: B256) -> Filter {
        let filter = Filter::new()
            .address(address)
            .event_signature(event)
            .from_block(self.start);

        match self.end {
            Some(end) => filter.to_block(end),
            None => filter,
        }
    }

    /// Options of a single attempt: same range, child context of the caller's.
    fn for_attempt(&self) -> Self {
        Self {
            start: self.start,
            end: self.end,
            context: self.context.child_token(),
        }
    }
}

/// Run `query` until it succeeds or `opts.context` is cancelled.
///
/// The outer context is checked before every attempt and before every sleep,
/// and both the in-flight attempt and the sleep are raced against it. The
/// attempt receives a child context that is cancelled once the attempt is
/// over, successful or not.
pub async fn retry_filter<T, E, F, Fut>(
    opts: &FilterOpts,
    policy: &RetryPolicy,
    mut query: F,
) -> Result<T, FilterError>
where
    F: FnMut(FilterOpts) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut delays = FixedInterval::new(policy.retry_interval);
    let mut attempts = 0u64;
    let mut last_error = None;

    loop {
        if opts.context.is_cancelled() {
            return Err(cancelled(opts, attempts, last_error));
        }

        attempts += 1;
        counter!("bridge_filter_attempts_total").increment(1);

        let attempt = opts.for_attempt();
        let _guard = attempt.context.clone().drop_guard();
        let outcome = tokio::select! {
            biased;
            _ = opts.context.cancelled() => return Err(cancelled(opts, attempts, last_error)),
            outcome = tokio::time::timeout(policy.connection_timeout, query(attempt)) => outcome,
        };

        let error = match outcome {
            Ok(Ok(value)) => {
                debug!(from = opts.start, to = ?opts.end, attempts, "Log query succeeded");
                return Ok(value);
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {:?}", policy.connection_timeout),
        };

        counter!("bridge_filter_failures_total").increment(1);
        warn!(
            from = opts.start,
            to = ?opts.end,
            attempt = attempts,
            error = %error,
            "Log query failed, will retry"
        );
        last_error = Some(error);

        if opts.context.is_cancelled() {
            return Err(cancelled(opts, attempts, last_error));
        }

        let delay = delays.next().unwrap_or(policy.retry_interval);
        tokio::select! {
            biased;
            _ = opts.context.cancelled() => return Err(cancelled(opts, attempts, last_error)),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

fn cancelled(opts: &FilterOpts, attempts: u64, last_error: Option<String>) -> FilterError {
    debug!(
        from = opts.start,
        to = ?opts.end,
        attempts,
        "Log query cancelled"
    );
    FilterError::Cancelled {
        attempts,
        last_error,
    }
}

/// Query `ETHDepositInitiated` logs until success or cancellation.
pub async fn filter_eth_deposit_initiated_with_retry<C: LogFilterer>(
    filterer: &L1StandardBridgeFilterer<C>,
    opts: &FilterOpts,
    policy: &RetryPolicy,
) -> Result<Vec<Log>, FilterError> {
    retry_filter(opts, policy, |attempt| async move {
        filterer.filter_eth_deposit_initiated(&attempt).await
    })
    .await
}

/// Query `ERC20DepositInitiated` logs until success or cancellation.
pub async fn filter_erc20_deposit_initiated_with_retry<C: LogFilterer>(
    filterer: &L1StandardBridgeFilterer<C>,
    opts: &FilterOpts,
    policy: &RetryPolicy,
) -> Result<Vec<Log>, FilterError> {
    retry_filter(opts, policy, |attempt| async move {
        filterer.filter_erc20_deposit_initiated(&attempt).await
    })
    .await
}

/// Query `StateBatchAppended` logs until success or cancellation.
pub async fn filter_state_batch_appended_with_retry<C: LogFilterer>(
    filterer: &StateCommitmentChainFilterer<C>,
    opts: &FilterOpts,
    policy: &RetryPolicy,
) -> Result<Vec<Log>, FilterError> {
    retry_filter(opts, policy, |attempt| async move {
        filterer.filter_state_batch_appended(&attempt).await
    })
    .await
}
