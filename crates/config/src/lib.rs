//! Configuration types for the deposit indexer.
//!
//! This crate provides:
//! - The per-network contract address book (L1 tables per network, one shared L2 table)
//! - Address book loading from TOML overrides

pub mod address_book;

pub use address_book::{
    networks, AddressBook, AddressBookError, Contract, L1Contracts, L2Contracts, Layer, NetworkId,
};
