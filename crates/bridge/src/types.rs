use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asset moved by a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Asset {
    /// Native ether
    Native,
    /// ERC20 token and its L2 counterpart
    Token { l1_token: Address, l2_token: Address },
}

/// A deposit initiated on L1 towards L2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// Hash of the L1 transaction that initiated the deposit
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// Position of the deposit log within its block
    pub log_index: u64,
    pub asset: Asset,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    /// Extra data forwarded to the L2 recipient
    pub data: Bytes,
}

/// Deposits grouped by L1 transaction hash.
///
/// A transaction may initiate several deposits (batched calls), so each entry
/// holds the deposits of that transaction in log emission order.
pub type DepositIndex = HashMap<TxHash, Vec<Deposit>>;

/// Merge the deposits of `other` into `index`.
///
/// A transaction seen by several bridges ends up with its deposits in log
/// emission order, whichever bridge reported them first.
pub fn merge_deposits(index: &mut DepositIndex, other: DepositIndex) {
    for (tx_hash, deposits) in other {
        let entry = index.entry(tx_hash).or_default();
        entry.extend(deposits);
        entry.sort_by_key(|d| d.log_index);
    }
}

/// A batch of L2 state roots appended to the `StateCommitmentChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBatch {
    pub batch_index: U256,
    pub batch_root: B256,
    pub batch_size: U256,
    pub prev_total_elements: U256,
    pub extra_data: Bytes,
    pub tx_hash: TxHash,
    pub block_number: u64,
}
