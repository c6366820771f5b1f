//! Construction of the bridges of a network.

use crate::{
    adapter::{Bridge, BridgeKind},
    error::BridgeError,
    eth::EthBridge,
    filter::RetryPolicy,
    filterer::{L1StandardBridgeFilterer, LogFilterer, StateCommitmentChainFilterer},
    scc::StateCommitmentChain,
    standard::StandardBridge,
};
use config::{networks, AddressBook, Contract, Layer, NetworkId};
use std::{collections::BTreeMap, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Builds [`Bridge`] adapters from the address book.
///
/// Which adapters a network gets is decided by its construction rule. A
/// network with a known address table but no rule has nothing to scan yet
/// and yields no bridges.
#[derive(Debug, Clone)]
pub struct BridgeFactory {
    book: Arc<AddressBook>,
    rules: BTreeMap<NetworkId, Vec<BridgeKind>>,
    policy: RetryPolicy,
}

impl BridgeFactory {
    /// Factory with the built-in construction rules.
    pub fn new(book: Arc<AddressBook>) -> Self {
        let rules = BTreeMap::from([(
            networks::KOVAN,
            vec![BridgeKind::Standard, BridgeKind::Eth],
        )]);

        Self {
            book,
            rules,
            policy: RetryPolicy::default(),
        }
    }

    /// Set the bridges built for `network`, replacing any existing rule.
    pub fn with_rule(
        mut self,
        network: NetworkId,
        kinds: impl IntoIterator<Item = BridgeKind>,
    ) -> Self {
        self.rules.insert(network, kinds.into_iter().collect());
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn address_book(&self) -> &AddressBook {
        &self.book
    }

    /// Bridges of `network`, all sharing one filterer bound to the network's
    /// `L1StandardBridge` and `client`.
    pub fn bridges_for_network<C>(
        &self,
        network: NetworkId,
        client: C,
        context: CancellationToken,
    ) -> Result<Vec<Box<dyn Bridge>>, BridgeError>
    where
        C: LogFilterer + 'static,
    {
        let address = self
            .book
            .resolve(network, Layer::L1, Contract::L1StandardBridge)?;
        let filterer = Arc::new(L1StandardBridgeFilterer::new(address, client)?);

        let Some(kinds) = self.rules.get(&network) else {
            debug!(network, "No bridge construction rule for network");
            return Ok(vec![]);
        };

        let bridges = kinds
            .iter()
            .map(|kind| -> Box<dyn Bridge> {
                match kind {
                    BridgeKind::Standard => Box::new(StandardBridge::new(
                        context.clone(),
                        Arc::clone(&filterer),
                        self.policy,
                    )),
                    BridgeKind::Eth => Box::new(EthBridge::new(
                        context.clone(),
                        Arc::clone(&filterer),
                        self.policy,
                    )),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            network,
            address = %address,
            bridges = bridges.len(),
            "Constructed bridges"
        );

        Ok(bridges)
    }

    /// State batch scanner bound to the network's `StateCommitmentChain`.
    pub fn state_commitment_chain<C: LogFilterer>(
        &self,
        network: NetworkId,
        client: C,
        context: CancellationToken,
    ) -> Result<StateCommitmentChain<C>, BridgeError> {
        let address = self
            .book
            .resolve(network, Layer::L1, Contract::StateCommitmentChain)?;
        let filterer = StateCommitmentChainFilterer::new(address, client)?;

        Ok(StateCommitmentChain::new(context, filterer, self.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing::MemoryLogs, types::Asset};
    use alloy_primitives::{address, Bytes, B256, U256};
    use binding::l1bridge::IL1StandardBridge::{ERC20DepositInitiated, ETHDepositInitiated};
    use config::{AddressBookError, L1Contracts};

    fn factory() -> BridgeFactory {
        BridgeFactory::new(Arc::new(AddressBook::builtin()))
    }

    #[test]
    fn test_kovan_gets_standard_and_eth_bridges() {
        let bridges = factory()
            .bridges_for_network(networks::KOVAN, MemoryLogs::new(), CancellationToken::new())
            .unwrap();

        assert_eq!(bridges.len(), 2);
        let kovan_bridge = address!("22F24361D548e5FaAfb36d1437839f080363982B");
        for bridge in &bridges {
            assert_eq!(bridge.address(), kovan_bridge);
        }
        assert!(format!("{:?}", bridges[0]).starts_with("StandardBridge"));
        assert!(format!("{:?}", bridges[1]).starts_with("EthBridge"));
    }

    #[test]
    fn test_bridges_are_deterministic() {
        let factory = factory();
        let first = factory
            .bridges_for_network(networks::KOVAN, MemoryLogs::new(), CancellationToken::new())
            .unwrap();
        let second = factory
            .bridges_for_network(networks::KOVAN, MemoryLogs::new(), CancellationToken::new())
            .unwrap();

        let addresses = |bridges: &[Box<dyn Bridge>]| {
            bridges.iter().map(|b| b.address()).collect::<Vec<_>>()
        };
        assert_eq!(addresses(&first), addresses(&second));
    }

    #[test]
    fn test_network_without_rule_yields_no_bridges() {
        for network in [networks::MAINNET, networks::GOERLI, networks::HARDHAT] {
            let bridges = factory()
                .bridges_for_network(network, MemoryLogs::new(), CancellationToken::new())
                .unwrap();
            assert!(bridges.is_empty(), "network {network}");
        }
    }

    #[test]
    fn test_unknown_network_is_an_error() {
        let err = factory()
            .bridges_for_network(10, MemoryLogs::new(), CancellationToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::AddressResolution(AddressBookError::UnknownNetwork { network: 10 })
        ));
    }

    #[test]
    fn test_zero_bridge_address_rejected() {
        let mut l1 = L1Contracts::mainnet();
        l1.l1_standard_bridge = alloy_primitives::Address::ZERO;
        let book = AddressBook::builtin().with_l1_table(10, l1);

        let err = BridgeFactory::new(Arc::new(book))
            .with_rule(10, [BridgeKind::Eth])
            .bridges_for_network(10, MemoryLogs::new(), CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, BridgeError::ClientConstruction { .. }));
    }

    #[test]
    fn test_custom_rule() {
        let bridges = factory()
            .with_rule(networks::MAINNET, [BridgeKind::Eth])
            .bridges_for_network(networks::MAINNET, MemoryLogs::new(), CancellationToken::new())
            .unwrap();

        assert_eq!(bridges.len(), 1);
        assert_eq!(
            bridges[0].address(),
            address!("99C9fc46f92E8a1c0deC1b1747d010903E884bE1")
        );
    }

    #[test]
    fn test_state_commitment_chain_address() {
        let scc = factory()
            .state_commitment_chain(networks::GOERLI, MemoryLogs::new(), CancellationToken::new())
            .unwrap();
        assert_eq!(
            scc.address(),
            address!("1afcA918eff169eE20fF8AB6Be75f3E872eE1C1A")
        );
    }

    #[tokio::test]
    async fn test_bridges_scan_their_own_events() {
        let kovan_bridge = address!("22F24361D548e5FaAfb36d1437839f080363982B");
        let logs = MemoryLogs::new();
        let t1 = B256::repeat_byte(0x01);
        let t2 = B256::repeat_byte(0x02);

        logs.push_event(
            kovan_bridge,
            &ERC20DepositInitiated {
                _l1Token: address!("1111111111111111111111111111111111111111"),
                _l2Token: address!("2222222222222222222222222222222222222222"),
                _from: address!("3333333333333333333333333333333333333333"),
                _to: address!("4444444444444444444444444444444444444444"),
                _amount: U256::from(1_000),
                _data: Bytes::new(),
            },
            150,
            t1,
            2,
        );
        logs.push_event(
            kovan_bridge,
            &ETHDepositInitiated {
                _from: address!("3333333333333333333333333333333333333333"),
                _to: address!("3333333333333333333333333333333333333333"),
                _amount: U256::from(5_000),
                _data: Bytes::from(vec![0xde, 0xad]),
            },
            180,
            t2,
            0,
        );
        // same event from an unrelated contract must be ignored
        logs.push_event(
            address!("5555555555555555555555555555555555555555"),
            &ETHDepositInitiated {
                _from: address!("3333333333333333333333333333333333333333"),
                _to: address!("3333333333333333333333333333333333333333"),
                _amount: U256::from(1),
                _data: Bytes::new(),
            },
            181,
            B256::repeat_byte(0x03),
            0,
        );

        let bridges = factory()
            .bridges_for_network(networks::KOVAN, logs.clone(), CancellationToken::new())
            .unwrap();

        let token = bridges[0].get_deposits_by_block_range(100, 200).await.unwrap();
        assert_eq!(token.len(), 1);
        assert_eq!(token[&t1][0].amount, U256::from(1_000));
        assert_eq!(token[&t1][0].log_index, 2);
        assert!(matches!(token[&t1][0].asset, Asset::Token { .. }));

        let native = bridges[1].get_deposits_by_block_range(100, 200).await.unwrap();
        assert_eq!(native.len(), 1);
        assert_eq!(native[&t2][0].asset, Asset::Native);
        assert_eq!(native[&t2][0].data, Bytes::from(vec![0xde, 0xad]));
        assert_eq!(native[&t2][0].block_number, 180);
    }

    #[tokio::test]
    async fn test_batched_deposits_share_transaction() {
        let kovan_bridge = address!("22F24361D548e5FaAfb36d1437839f080363982B");
        let logs = MemoryLogs::new();
        let tx_hash = B256::repeat_byte(0x07);

        for (log_index, amount) in [(4u64, 30u64), (5, 10), (6, 20)] {
            logs.push_event(
                kovan_bridge,
                &ETHDepositInitiated {
                    _from: address!("3333333333333333333333333333333333333333"),
                    _to: address!("4444444444444444444444444444444444444444"),
                    _amount: U256::from(amount),
                    _data: Bytes::new(),
                },
                120,
                tx_hash,
                log_index,
            );
        }

        let bridges = factory()
            .bridges_for_network(networks::KOVAN, logs, CancellationToken::new())
            .unwrap();
        let index = bridges[1].get_deposits_by_block_range(120, 120).await.unwrap();

        let amounts: Vec<U256> = index[&tx_hash].iter().map(|d| d.amount).collect();
        assert_eq!(
            amounts,
            vec![U256::from(30), U256::from(10), U256::from(20)]
        );
    }
}
