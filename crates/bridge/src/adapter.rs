//! The [`Bridge`] capability and helpers shared by its implementations.

use crate::{
    error::BridgeError,
    types::{Deposit, DepositIndex},
};
use alloy_primitives::{Address, TxHash};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use metrics::counter;
use std::fmt;

/// A bridge contract whose deposits can be scanned by block range.
#[async_trait]
pub trait Bridge: Send + Sync + fmt::Debug {
    /// Address of the contract the bridge is bound to.
    fn address(&self) -> Address;

    /// All deposits initiated within `from_block..=to_block`, keyed by L1
    /// transaction hash.
    ///
    /// Deposits of one transaction keep their log emission order; no order is
    /// promised across transactions. Fails with
    /// [`BridgeError::InvalidBlockRange`] before any query when
    /// `from_block > to_block`.
    async fn get_deposits_by_block_range(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<DepositIndex, BridgeError>;
}

/// Deposit flavours a network can be scanned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeKind {
    /// ERC20 deposits through the standard bridge
    Standard,
    /// Native ether deposits
    Eth,
}

impl BridgeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Eth => "eth",
        }
    }
}

impl fmt::Display for BridgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) const fn check_block_range(from: u64, to: u64) -> Result<(), BridgeError> {
    if from > to {
        return Err(BridgeError::InvalidBlockRange { from, to });
    }
    Ok(())
}

/// Location of a decoded log on chain.
#[derive(Debug)]
pub(crate) struct LogMeta {
    pub(crate) tx_hash: TxHash,
    pub(crate) block_number: u64,
    pub(crate) log_index: u64,
}

/// Decode `log` as `E`; a log without a transaction hash cannot be indexed
/// and is treated as undecodable.
pub(crate) fn decode_log<E: SolEvent>(log: &Log) -> Result<(E, LogMeta), BridgeError> {
    let block_number = log.block_number.unwrap_or_default();
    let decode_error = |reason: String| BridgeError::Decode {
        event: E::SIGNATURE,
        block: block_number,
        reason,
    };

    let decoded = log
        .log_decode::<E>()
        .map_err(|e| decode_error(e.to_string()))?;
    let tx_hash = log
        .transaction_hash
        .ok_or_else(|| decode_error("log has no transaction hash".to_string()))?;

    let meta = LogMeta {
        tx_hash,
        block_number,
        log_index: log.log_index.unwrap_or_default(),
    };
    Ok((decoded.inner.data, meta))
}

/// Decode every log with `to_deposit` and group the results by transaction.
pub(crate) fn index_deposits<E: SolEvent>(
    kind: BridgeKind,
    logs: &[Log],
    to_deposit: impl Fn(E, LogMeta) -> Deposit,
) -> Result<DepositIndex, BridgeError> {
    let mut index = DepositIndex::new();
    for log in logs {
        let (event, meta) = decode_log::<E>(log)?;
        let deposit = to_deposit(event, meta);
        index.entry(deposit.tx_hash).or_default().push(deposit);
    }

    counter!("bridge_deposits_total", "bridge" => kind.as_str()).increment(logs.len() as u64);
    Ok(index)
}
