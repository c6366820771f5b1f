//! Log-filtering clients bound to a single contract.

use crate::{error::BridgeError, filter::FilterOpts};
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::SolEvent;
use alloy_transport::TransportResult;
use async_trait::async_trait;
use binding::{
    l1bridge::IL1StandardBridge::{ERC20DepositInitiated, ETHDepositInitiated},
    scc::IStateCommitmentChain::StateBatchAppended,
};
use std::fmt;

/// Capability to query a node's historical logs.
///
/// Implemented for every alloy [`Provider`]; tests plug in an in-memory log
/// source instead.
#[async_trait]
pub trait LogFilterer: Send + Sync {
    async fn filter_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>>;
}

#[async_trait]
impl<P> LogFilterer for P
where
    P: Provider,
{
    async fn filter_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
        self.get_logs(filter).await
    }
}

fn bind(address: Address) -> Result<Address, BridgeError> {
    if address.is_zero() {
        return Err(BridgeError::ClientConstruction {
            address,
            reason: "contract address is zero".to_string(),
        });
    }
    Ok(address)
}

/// Filterer for the events of an `L1StandardBridge` deployment.
pub struct L1StandardBridgeFilterer<C> {
    address: Address,
    client: C,
}

impl<C: LogFilterer> L1StandardBridgeFilterer<C> {
    pub fn new(address: Address, client: C) -> Result<Self, BridgeError> {
        Ok(Self {
            address: bind(address)?,
            client,
        })
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    /// Single `ETHDepositInitiated` query, no retries.
    pub async fn filter_eth_deposit_initiated(
        &self,
        opts: &FilterOpts,
    ) -> TransportResult<Vec<Log>> {
        let filter = opts.filter(self.address, ETHDepositInitiated::SIGNATURE_HASH);
        self.client.filter_logs(&filter).await
    }

    /// Single `ERC20DepositInitiated` query, no retries.
    pub async fn filter_erc20_deposit_initiated(
        &self,
        opts: &FilterOpts,
    ) -> TransportResult<Vec<Log>> {
        let filter = opts.filter(self.address, ERC20DepositInitiated::SIGNATURE_HASH);
        self.client.filter_logs(&filter).await
    }
}

impl<C> fmt::Debug for L1StandardBridgeFilterer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("L1StandardBridgeFilterer")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Filterer for the events of a `StateCommitmentChain` deployment.
pub struct StateCommitmentChainFilterer<C> {
    address: Address,
    client: C,
}

impl<C: LogFilterer> StateCommitmentChainFilterer<C> {
    pub fn new(address: Address, client: C) -> Result<Self, BridgeError> {
        Ok(Self {
            address: bind(address)?,
            client,
        })
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    /// Single `StateBatchAppended` query, no retries.
    pub async fn filter_state_batch_appended(
        &self,
        opts: &FilterOpts,
    ) -> TransportResult<Vec<Log>> {
        let filter = opts.filter(self.address, StateBatchAppended::SIGNATURE_HASH);
        self.client.filter_logs(&filter).await
    }
}

impl<C> fmt::Debug for StateCommitmentChainFilterer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCommitmentChainFilterer")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
