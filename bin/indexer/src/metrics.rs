//! Prometheus metrics for the indexer.
//!
//! Counters emitted by the bridge crate are described here so the exporter
//! can render help text for them.

use eyre::WrapErr;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{net::SocketAddr, time::Duration};

/// Aggregated metrics for the indexer.
///
/// Metrics are registered with the global metrics registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        // Retry engine
        describe_counter!(
            "bridge_filter_attempts_total",
            "Total number of log filter attempts, retries included"
        );
        describe_counter!(
            "bridge_filter_failures_total",
            "Total number of failed or timed out log filter attempts"
        );

        // Adapters
        describe_counter!(
            "bridge_deposits_total",
            "Total number of deposits decoded by bridge kind"
        );

        // Scans
        describe_counter!(
            "indexer_scans_total",
            "Total number of block range scans by outcome"
        );
        describe_histogram!(
            "indexer_scan_duration_seconds",
            "Duration of each block range scan in seconds"
        );
    }

    /// Record a completed scan of `kind` ("deposits" or "state_batches").
    pub fn record_scan(&self, kind: &'static str, success: bool, duration: Duration) {
        let outcome = if success { "success" } else { "failure" };
        counter!("indexer_scans_total", "kind" => kind, "outcome" => outcome).increment(1);
        histogram!("indexer_scan_duration_seconds", "kind" => kind).record(duration.as_secs_f64());
    }
}

/// Serve the global registry in Prometheus format on `listener`.
///
/// Every counter described by [`Metrics`] is exposed, including those recorded
/// inside the bridge crate.
pub fn install_prometheus_exporter(listener: SocketAddr) -> eyre::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(listener)
        .install()
        .wrap_err_with(|| format!("cannot serve metrics on {listener}"))
}
