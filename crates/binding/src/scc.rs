//! StateCommitmentChain contract bindings.

use alloy_sol_types::sol;

sol! {
    /// StateCommitmentChain - L1 contract storing batches of L2 state roots
    interface IStateCommitmentChain {
        /// Emitted when a batch of state roots is appended
        event StateBatchAppended(
            uint256 indexed _batchIndex,
            bytes32 _batchRoot,
            uint256 _batchSize,
            uint256 _prevTotalElements,
            bytes _extraData
        );
    }
}
