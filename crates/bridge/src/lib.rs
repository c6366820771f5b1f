//! Deposit scanning for the L1 bridge contracts.
//!
//! This crate resolves the bridge contracts of a network, builds typed
//! [`Bridge`] adapters on top of a log-filtering client and retrieves the
//! deposits initiated within a block range. Every log query goes through the
//! retry engine in [`filter`], which retries transient failures at a fixed
//! interval until the query succeeds or the caller cancels.

pub mod adapter;
pub mod error;
pub mod eth;
pub mod factory;
pub mod filter;
pub mod filterer;
pub mod scc;
pub mod standard;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapter::{Bridge, BridgeKind};
pub use error::BridgeError;
pub use eth::EthBridge;
pub use factory::BridgeFactory;
pub use filter::{retry_filter, FilterError, FilterOpts, RetryPolicy};
pub use filterer::{L1StandardBridgeFilterer, LogFilterer, StateCommitmentChainFilterer};
pub use scc::StateCommitmentChain;
pub use standard::StandardBridge;
pub use types::{merge_deposits, Asset, Deposit, DepositIndex, StateBatch};
