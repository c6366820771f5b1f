use crate::filter::FilterError;
use alloy_primitives::Address;
use config::AddressBookError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The contract address could not be resolved from the address book
    #[error("address resolution failed: {0}")]
    AddressResolution(#[from] AddressBookError),

    /// The filterer refused to bind to the resolved address
    #[error("cannot bind filterer to {address}: {reason}")]
    ClientConstruction { address: Address, reason: String },

    #[error("invalid block range: from block {from} is after to block {to}")]
    InvalidBlockRange { from: u64, to: u64 },

    /// The log query never succeeded before the scan was cancelled
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A log matched the filter but does not decode as the expected event
    #[error("failed to decode {event} log at block {block}: {reason}")]
    Decode {
        event: &'static str,
        block: u64,
        reason: String,
    },
}
