//! L1StandardBridge contract bindings.
//!
//! Both deposit flavours are emitted by the same contract, so a single
//! interface covers native-asset and token deposits.

use alloy_sol_types::sol;

sol! {
    /// L1StandardBridge - L1 entry point for ETH and ERC20 deposits into L2
    interface IL1StandardBridge {
        /// Emitted when ETH is deposited from L1 to L2
        #[derive(Debug)]
        event ETHDepositInitiated(
            address indexed _from,
            address indexed _to,
            uint256 _amount,
            bytes _data
        );

        /// Emitted when an ERC20 token is deposited from L1 to L2
        #[derive(Debug)]
        event ERC20DepositInitiated(
            address indexed _l1Token,
            address indexed _l2Token,
            address indexed _from,
            address _to,
            uint256 _amount,
            bytes _data
        );
    }
}
