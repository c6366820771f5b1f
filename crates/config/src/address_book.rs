//! Contract address book.
//!
//! Maps `(network id, layer, contract)` to a deployed contract address. L1
//! tables are network specific, while every network shares one canonical L2
//! table because L2 contracts live at predetermined predeploy addresses.
//!
//! The book is built once at startup and is read-only afterwards; share it
//! through an [`Arc`].

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, path::Path, str::FromStr, sync::Arc};
use thiserror::Error;

/// Chain id used as the address book key.
pub type NetworkId = u64;

/// Chain ids with built-in L1 tables.
pub mod networks {
    use super::NetworkId;

    pub const MAINNET: NetworkId = 1;
    pub const GOERLI: NetworkId = 5;
    pub const KOVAN: NetworkId = 42;
    /// Local hardhat development network
    pub const HARDHAT: NetworkId = 31337;
}

#[derive(Error, Debug)]
pub enum AddressBookError {
    #[error("unknown network: {network}")]
    UnknownNetwork { network: NetworkId },

    #[error("unknown contract {contract} on {layer} of network {network}")]
    UnknownContract {
        network: NetworkId,
        layer: Layer,
        contract: String,
    },

    #[error("failed to read address book: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse address book: {0}")]
    Parse(String),
}

/// Chain layer a contract is deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    L1,
    L2,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => f.write_str("l1"),
            Self::L2 => f.write_str("l2"),
        }
    }
}

/// Names of the contracts tracked by the address book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Contract {
    // L1
    AddressManager,
    L1CrossDomainMessenger,
    L1StandardBridge,
    StateCommitmentChain,
    CanonicalTransactionChain,
    BondManager,
    // L2
    L2ToL1MessagePasser,
    DeployerWhitelist,
    L2CrossDomainMessenger,
    GasPriceOracle,
    L2StandardBridge,
    SequencerFeeVault,
    L2StandardTokenFactory,
    L1BlockNumber,
    OvmEth,
    Weth9,
}

impl Contract {
    pub const ALL: [Self; 16] = [
        Self::AddressManager,
        Self::L1CrossDomainMessenger,
        Self::L1StandardBridge,
        Self::StateCommitmentChain,
        Self::CanonicalTransactionChain,
        Self::BondManager,
        Self::L2ToL1MessagePasser,
        Self::DeployerWhitelist,
        Self::L2CrossDomainMessenger,
        Self::GasPriceOracle,
        Self::L2StandardBridge,
        Self::SequencerFeeVault,
        Self::L2StandardTokenFactory,
        Self::L1BlockNumber,
        Self::OvmEth,
        Self::Weth9,
    ];

    /// Canonical deployment name of the contract.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddressManager => "AddressManager",
            Self::L1CrossDomainMessenger => "L1CrossDomainMessenger",
            Self::L1StandardBridge => "L1StandardBridge",
            Self::StateCommitmentChain => "StateCommitmentChain",
            Self::CanonicalTransactionChain => "CanonicalTransactionChain",
            Self::BondManager => "BondManager",
            Self::L2ToL1MessagePasser => "OVM_L2ToL1MessagePasser",
            Self::DeployerWhitelist => "OVM_DeployerWhitelist",
            Self::L2CrossDomainMessenger => "L2CrossDomainMessenger",
            Self::GasPriceOracle => "OVM_GasPriceOracle",
            Self::L2StandardBridge => "L2StandardBridge",
            Self::SequencerFeeVault => "OVM_SequencerFeeVault",
            Self::L2StandardTokenFactory => "L2StandardTokenFactory",
            Self::L1BlockNumber => "OVM_L1BlockNumber",
            Self::OvmEth => "OVM_ETH",
            Self::Weth9 => "WETH9",
        }
    }

    /// Layer the contract is deployed on.
    pub const fn layer(self) -> Layer {
        match self {
            Self::AddressManager
            | Self::L1CrossDomainMessenger
            | Self::L1StandardBridge
            | Self::StateCommitmentChain
            | Self::CanonicalTransactionChain
            | Self::BondManager => Layer::L1,
            _ => Layer::L2,
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Contract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// L1 contract table of a single network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct L1Contracts {
    pub address_manager: Address,
    #[serde(rename = "L1CrossDomainMessenger")]
    pub l1_cross_domain_messenger: Address,
    #[serde(rename = "L1StandardBridge")]
    pub l1_standard_bridge: Address,
    pub state_commitment_chain: Address,
    pub canonical_transaction_chain: Address,
    pub bond_manager: Address,
}

impl L1Contracts {
    /// Ethereum mainnet deployment.
    pub const fn mainnet() -> Self {
        Self {
            address_manager: address!("0xdE1FCfB0851916CA5101820A69b13a4E276bd81F"),
            l1_cross_domain_messenger: address!("0x25ace71c97B33Cc4729CF772ae268934F7ab5fA1"),
            l1_standard_bridge: address!("0x99C9fc46f92E8a1c0deC1b1747d010903E884bE1"),
            state_commitment_chain: address!("0xBe5dAb4A2e9cd0F27300dB4aB94BeE3A233AEB19"),
            canonical_transaction_chain: address!("0x5E4e65926BA27467555EB562121fac00D24E9dD2"),
            bond_manager: address!("0xcd626E1328b41fCF24737F137BcD4CE0c32bc8d1"),
        }
    }

    /// Kovan testnet deployment.
    pub const fn kovan() -> Self {
        Self {
            address_manager: address!("0x100Dd3b414Df5BbA2B542864fF94aF8024aFdf3a"),
            l1_cross_domain_messenger: address!("0x4361d0F75A0186C05f971c566dC6bEa5957483fD"),
            l1_standard_bridge: address!("0x22F24361D548e5FaAfb36d1437839f080363982B"),
            state_commitment_chain: address!("0xD7754711773489F31A0602635f3F167826ce53C5"),
            canonical_transaction_chain: address!("0xf7B88A133202d41Fe5E2Ab22e6309a1A4D50AF74"),
            bond_manager: address!("0xc5a603d273E28185c18Ba4d26A0024B2d2F42740"),
        }
    }

    /// Goerli testnet deployment.
    pub const fn goerli() -> Self {
        Self {
            address_manager: address!("0x2F7E3cAC91b5148d336BbffB224B4dC79F09f01D"),
            l1_cross_domain_messenger: address!("0xEcC89b9EDD804850C4F343A278Be902be11AaF42"),
            l1_standard_bridge: address!("0x73298186A143a54c20ae98EEE5a025bD5979De02"),
            state_commitment_chain: address!("0x1afcA918eff169eE20fF8AB6Be75f3E872eE1C1A"),
            canonical_transaction_chain: address!("0x2ebA8c4EfDB39A8Cd8f9eD65c50ec079f7CEBD81"),
            bond_manager: address!("0xE5AE60bD6F8DEe4D0c2BC9268e23B92F1cacC58F"),
        }
    }

    /// Local hardhat deployment (deterministic deployer addresses).
    pub const fn hardhat() -> Self {
        Self {
            address_manager: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            l1_cross_domain_messenger: address!("0x8A791620dd6260079BF849Dc5567aDC3F2FdC318"),
            l1_standard_bridge: address!("0x610178dA211FEF7D417bC0e6FeD39F05609AD788"),
            state_commitment_chain: address!("0xDc64a140Aa3E981100a9becA4E685f962f0cF6C9"),
            canonical_transaction_chain: address!("0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9"),
            bond_manager: address!("0x5FC8d32690cc91D4c39d9d3abcBD16989F875707"),
        }
    }

    /// Look up an L1 contract; `None` for L2 contracts.
    pub const fn get(&self, contract: Contract) -> Option<Address> {
        match contract {
            Contract::AddressManager => Some(self.address_manager),
            Contract::L1CrossDomainMessenger => Some(self.l1_cross_domain_messenger),
            Contract::L1StandardBridge => Some(self.l1_standard_bridge),
            Contract::StateCommitmentChain => Some(self.state_commitment_chain),
            Contract::CanonicalTransactionChain => Some(self.canonical_transaction_chain),
            Contract::BondManager => Some(self.bond_manager),
            _ => None,
        }
    }
}

/// L2 predeploy table, identical on every network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2Contracts {
    pub l2_to_l1_message_passer: Address,
    pub deployer_whitelist: Address,
    pub l2_cross_domain_messenger: Address,
    pub gas_price_oracle: Address,
    pub l2_standard_bridge: Address,
    pub sequencer_fee_vault: Address,
    pub l2_standard_token_factory: Address,
    pub l1_block_number: Address,
    /// OVM_ETH is parked at a dead address while ETH-as-ERC20 is disabled.
    pub ovm_eth: Address,
    /// WETH9 lives at the old OVM_ETH predeploy.
    pub weth9: Address,
}

impl L2Contracts {
    pub const fn predeploys() -> Self {
        Self {
            l2_to_l1_message_passer: address!("0x4200000000000000000000000000000000000000"),
            deployer_whitelist: address!("0x4200000000000000000000000000000000000002"),
            l2_cross_domain_messenger: address!("0x4200000000000000000000000000000000000007"),
            gas_price_oracle: address!("0x420000000000000000000000000000000000000F"),
            l2_standard_bridge: address!("0x4200000000000000000000000000000000000010"),
            sequencer_fee_vault: address!("0x4200000000000000000000000000000000000011"),
            l2_standard_token_factory: address!("0x4200000000000000000000000000000000000012"),
            l1_block_number: address!("0x4200000000000000000000000000000000000013"),
            ovm_eth: address!("0xDeadDeAddeAddEAddeadDEaDDEAdDeaDDeAD0000"),
            weth9: address!("0x4200000000000000000000000000000000000006"),
        }
    }

    /// Look up an L2 contract; `None` for L1 contracts.
    pub const fn get(&self, contract: Contract) -> Option<Address> {
        match contract {
            Contract::L2ToL1MessagePasser => Some(self.l2_to_l1_message_passer),
            Contract::DeployerWhitelist => Some(self.deployer_whitelist),
            Contract::L2CrossDomainMessenger => Some(self.l2_cross_domain_messenger),
            Contract::GasPriceOracle => Some(self.gas_price_oracle),
            Contract::L2StandardBridge => Some(self.l2_standard_bridge),
            Contract::SequencerFeeVault => Some(self.sequencer_fee_vault),
            Contract::L2StandardTokenFactory => Some(self.l2_standard_token_factory),
            Contract::L1BlockNumber => Some(self.l1_block_number),
            Contract::OvmEth => Some(self.ovm_eth),
            Contract::Weth9 => Some(self.weth9),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct NetworkTables {
    l1: L1Contracts,
    l2: Arc<L2Contracts>,
}

/// TOML layout of address book overrides:
///
/// ```toml
/// [networks.10]
/// AddressManager = "0x..."
/// L1CrossDomainMessenger = "0x..."
/// L1StandardBridge = "0x..."
/// StateCommitmentChain = "0x..."
/// CanonicalTransactionChain = "0x..."
/// BondManager = "0x..."
/// ```
#[derive(Debug, Deserialize)]
struct AddressBookFile {
    #[serde(default)]
    networks: BTreeMap<String, L1Contracts>,
}

/// Immutable `(network, layer, contract) -> address` registry.
#[derive(Debug, Clone)]
pub struct AddressBook {
    networks: BTreeMap<NetworkId, NetworkTables>,
    l2: Arc<L2Contracts>,
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AddressBook {
    /// An address book with no networks, only the shared L2 table.
    pub fn empty() -> Self {
        Self {
            networks: BTreeMap::new(),
            l2: Arc::new(L2Contracts::predeploys()),
        }
    }

    /// Address book with the known mainnet, testnet and local deployments.
    pub fn builtin() -> Self {
        Self::empty()
            .with_l1_table(networks::MAINNET, L1Contracts::mainnet())
            .with_l1_table(networks::KOVAN, L1Contracts::kovan())
            .with_l1_table(networks::GOERLI, L1Contracts::goerli())
            .with_l1_table(networks::HARDHAT, L1Contracts::hardhat())
    }

    /// Add (or replace) the L1 table of a network. The network shares the
    /// default L2 table.
    pub fn with_l1_table(mut self, network: NetworkId, l1: L1Contracts) -> Self {
        let l2 = Arc::clone(&self.l2);
        self.networks.insert(network, NetworkTables { l1, l2 });
        self
    }

    /// Built-in book extended with the L1 tables of a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, AddressBookError> {
        let file: AddressBookFile =
            toml::from_str(contents).map_err(|e| AddressBookError::Parse(e.to_string()))?;

        file.networks
            .into_iter()
            .try_fold(Self::builtin(), |book, (key, l1)| {
                let network = key.parse::<NetworkId>().map_err(|e| {
                    AddressBookError::Parse(format!("invalid network id {key:?}: {e}"))
                })?;
                Ok(book.with_l1_table(network, l1))
            })
    }

    /// Built-in book extended with the L1 tables of a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AddressBookError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Resolve the address of `contract` on `layer` of `network`.
    pub fn resolve(
        &self,
        network: NetworkId,
        layer: Layer,
        contract: Contract,
    ) -> Result<Address, AddressBookError> {
        let tables = self
            .networks
            .get(&network)
            .ok_or(AddressBookError::UnknownNetwork { network })?;

        let address = match layer {
            Layer::L1 => tables.l1.get(contract),
            Layer::L2 => tables.l2.get(contract),
        };

        address.ok_or_else(|| AddressBookError::UnknownContract {
            network,
            layer,
            contract: contract.to_string(),
        })
    }

    /// Same as [`Self::resolve`], taking the contract's deployment name.
    pub fn resolve_by_name(
        &self,
        network: NetworkId,
        layer: Layer,
        name: &str,
    ) -> Result<Address, AddressBookError> {
        if !self.networks.contains_key(&network) {
            return Err(AddressBookError::UnknownNetwork { network });
        }
        let contract = name
            .parse::<Contract>()
            .map_err(|contract| AddressBookError::UnknownContract {
                network,
                layer,
                contract,
            })?;
        self.resolve(network, layer, contract)
    }

    /// Known network ids in ascending order.
    pub fn networks(&self) -> impl Iterator<Item = NetworkId> + '_ {
        self.networks.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILTIN: [NetworkId; 4] = [
        networks::MAINNET,
        networks::GOERLI,
        networks::KOVAN,
        networks::HARDHAT,
    ];

    #[test]
    fn test_every_builtin_triple_resolves() {
        let book = AddressBook::builtin();

        for network in BUILTIN {
            for contract in Contract::ALL {
                let address = book
                    .resolve(network, contract.layer(), contract)
                    .unwrap_or_else(|e| panic!("{network}/{contract}: {e}"));
                assert_ne!(address, Address::ZERO, "{network}/{contract}");
            }
        }
    }

    #[test]
    fn test_kovan_standard_bridge() {
        let book = AddressBook::builtin();
        let address = book
            .resolve(networks::KOVAN, Layer::L1, Contract::L1StandardBridge)
            .unwrap();
        assert_eq!(
            address,
            address!("22F24361D548e5FaAfb36d1437839f080363982B")
        );
    }

    #[test]
    fn test_unknown_network() {
        let book = AddressBook::builtin();
        let err = book
            .resolve(10, Layer::L1, Contract::L1StandardBridge)
            .unwrap_err();
        assert!(matches!(err, AddressBookError::UnknownNetwork { network: 10 }));

        let err = book.resolve_by_name(10, Layer::L2, "WETH9").unwrap_err();
        assert!(matches!(err, AddressBookError::UnknownNetwork { network: 10 }));
    }

    #[test]
    fn test_unknown_contract() {
        let book = AddressBook::builtin();

        // L2 predeploys are not part of the L1 table and vice versa
        let err = book
            .resolve(networks::MAINNET, Layer::L1, Contract::Weth9)
            .unwrap_err();
        assert!(matches!(err, AddressBookError::UnknownContract { .. }));

        let err = book
            .resolve(networks::MAINNET, Layer::L2, Contract::L1StandardBridge)
            .unwrap_err();
        assert!(matches!(err, AddressBookError::UnknownContract { .. }));

        let err = book
            .resolve_by_name(networks::MAINNET, Layer::L1, "OptimismPortal")
            .unwrap_err();
        match err {
            AddressBookError::UnknownContract { contract, layer, .. } => {
                assert_eq!(contract, "OptimismPortal");
                assert_eq!(layer, Layer::L1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_by_name_matches_enum() {
        let book = AddressBook::builtin();
        for contract in Contract::ALL {
            assert_eq!(
                book.resolve_by_name(networks::GOERLI, contract.layer(), contract.name())
                    .unwrap(),
                book.resolve(networks::GOERLI, contract.layer(), contract)
                    .unwrap()
            );
        }
    }

    #[test]
    fn test_l2_table_is_shared() {
        let book = AddressBook::builtin();

        for contract in Contract::ALL.into_iter().filter(|c| c.layer() == Layer::L2) {
            let mainnet = book.resolve(networks::MAINNET, Layer::L2, contract).unwrap();
            for network in BUILTIN {
                assert_eq!(book.resolve(network, Layer::L2, contract).unwrap(), mainnet);
            }
        }

        for tables in book.networks.values() {
            assert!(Arc::ptr_eq(&tables.l2, &book.l2));
        }
    }

    #[test]
    fn test_toml_overrides() {
        let contents = r#"
            [networks.10]
            AddressManager = "0x1111111111111111111111111111111111111111"
            L1CrossDomainMessenger = "0x2222222222222222222222222222222222222222"
            L1StandardBridge = "0x3333333333333333333333333333333333333333"
            StateCommitmentChain = "0x4444444444444444444444444444444444444444"
            CanonicalTransactionChain = "0x5555555555555555555555555555555555555555"
            BondManager = "0x6666666666666666666666666666666666666666"
        "#;

        let book = AddressBook::from_toml_str(contents).unwrap();
        assert_eq!(
            book.resolve(10, Layer::L1, Contract::L1StandardBridge).unwrap(),
            address!("3333333333333333333333333333333333333333")
        );
        // built-in networks are kept and the new network shares the L2 table
        assert_eq!(book.networks().collect::<Vec<_>>(), vec![1, 5, 10, 42, 31337]);
        assert_eq!(
            book.resolve(10, Layer::L2, Contract::Weth9).unwrap(),
            address!("4200000000000000000000000000000000000006")
        );
    }

    #[test]
    fn test_toml_incomplete_table_rejected() {
        let contents = r#"
            [networks.10]
            L1StandardBridge = "0x3333333333333333333333333333333333333333"
        "#;
        let err = AddressBook::from_toml_str(contents).unwrap_err();
        assert!(matches!(err, AddressBookError::Parse(_)));
    }

    #[test]
    fn test_toml_invalid_network_id() {
        let contents = r#"
            [networks.optimism]
            AddressManager = "0x1111111111111111111111111111111111111111"
            L1CrossDomainMessenger = "0x2222222222222222222222222222222222222222"
            L1StandardBridge = "0x3333333333333333333333333333333333333333"
            StateCommitmentChain = "0x4444444444444444444444444444444444444444"
            CanonicalTransactionChain = "0x5555555555555555555555555555555555555555"
            BondManager = "0x6666666666666666666666666666666666666666"
        "#;
        let err = AddressBook::from_toml_str(contents).unwrap_err();
        assert!(matches!(err, AddressBookError::Parse(_)));
    }
}
