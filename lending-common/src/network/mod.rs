use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::Address;

/// Decimals of the native currency, which the lending pool also uses as its base currency.
pub const NATIVE_DECIMALS: u8 = 18;

fn default_base_currency_decimals() -> u8 {
    NATIVE_DECIMALS
}

/// Network Definition is the chain id of a network together with the addresses of the
/// contracts the borrowing flow talks to on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDefinition {
    pub chain_id: u64,
    pub logical_name: String,
    pub weth_token: Address,
    pub lending_pool_addresses_provider: Address,
    pub dai_eth_price_feed: Address,
    pub dai_token: Address,
    /// Decimals of the figures returned by `getUserAccountData`.
    #[serde(default = "default_base_currency_decimals")]
    pub base_currency_decimals: u8,
}

const MAINNET_WETH: Address = Address::from_hex_literal("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
const MAINNET_ADDRESSES_PROVIDER: Address =
    Address::from_hex_literal("b53c1a33016b2dc2ff3653530bff1848a515c8c5");
const MAINNET_DAI_ETH_FEED: Address =
    Address::from_hex_literal("773616e4d11a78f511299002da57a0a94577f1f4");
const MAINNET_DAI: Address = Address::from_hex_literal("6b175474e89094c44da98b954eedeac495271d0f");

// NOTE: Local nodes are expected to run as a fork of mainnet, so they share its addresses.
impl NetworkDefinition {
    pub fn mainnet() -> NetworkDefinition {
        NetworkDefinition {
            chain_id: 1,
            logical_name: String::from("mainnet"),
            weth_token: MAINNET_WETH,
            lending_pool_addresses_provider: MAINNET_ADDRESSES_PROVIDER,
            dai_eth_price_feed: MAINNET_DAI_ETH_FEED,
            dai_token: MAINNET_DAI,
            base_currency_decimals: NATIVE_DECIMALS,
        }
    }

    pub fn localhost() -> NetworkDefinition {
        NetworkDefinition {
            chain_id: 31337,
            logical_name: String::from("localhost"),
            ..Self::mainnet()
        }
    }
}

impl FromStr for NetworkDefinition {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(NetworkDefinition::mainnet()),
            "localhost" | "hardhat" => Ok(NetworkDefinition::localhost()),
            _ => Err(ParseNetworkError::InvalidNetworkString),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNetworkError {
    InvalidNetworkString,
    UnknownChainId(u64),
}

impl std::error::Error for ParseNetworkError {}

impl fmt::Display for ParseNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The per-network configuration table, keyed by chain id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDefinitions {
    entries: Vec<NetworkDefinition>,
}

impl NetworkDefinitions {
    pub fn builtin() -> Self {
        Self {
            entries: vec![NetworkDefinition::mainnet(), NetworkDefinition::localhost()],
        }
    }

    /// Adds a definition, replacing any existing entry with the same chain id.
    pub fn insert(&mut self, definition: NetworkDefinition) {
        self.entries.retain(|d| d.chain_id != definition.chain_id);
        self.entries.push(definition);
    }

    pub fn for_chain_id(&self, chain_id: u64) -> Result<&NetworkDefinition, ParseNetworkError> {
        self.entries
            .iter()
            .find(|d| d.chain_id == chain_id)
            .ok_or(ParseNetworkError::UnknownChainId(chain_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkDefinition> {
        self.entries.iter()
    }
}

impl Extend<NetworkDefinition> for NetworkDefinitions {
    fn extend<T: IntoIterator<Item = NetworkDefinition>>(&mut self, iter: T) {
        for definition in iter {
            self.insert(definition);
        }
    }
}
