use bridge::RetryPolicy;
use config::{AddressBook, NetworkId};
use serde::{Deserialize, Serialize};
use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

/// Top-level indexer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// L1 RPC endpoint url
    pub l1_rpc_url: String,

    /// Chain id of the L1 network to scan
    pub network_id: NetworkId,

    /// Optional TOML file with extra L1 address tables
    #[serde(default)]
    pub address_book: Option<PathBuf>,

    /// Seconds to wait between retries of a failed log query
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,

    /// Seconds after which a single log query is abandoned
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,

    /// Port of the Prometheus exporter, disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

const fn default_retry_interval_secs() -> u64 {
    5
}

const fn default_connection_timeout_secs() -> u64 {
    20
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retry_interval: Duration::from_secs(self.retry_interval_secs),
            connection_timeout: Duration::from_secs(self.connection_timeout_secs),
        }
    }

    /// Address the metrics exporter listens on, when enabled.
    pub fn metrics_listener(&self) -> Option<SocketAddr> {
        self.metrics_port
            .map(|port| SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
    }

    /// Built-in address book, extended with the configured overrides.
    pub fn address_book(&self) -> eyre::Result<AddressBook> {
        let book = match &self.address_book {
            Some(path) => AddressBook::from_file(path)?,
            None => AddressBook::builtin(),
        };

        Ok(book)
    }
}
