//! Contract bindings for the L1 contracts scanned by the indexer.
//!
//! - L1StandardBridge (ETH and ERC20 deposit events)
//! - StateCommitmentChain (state batch events)
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod l1bridge;
pub mod scc;
