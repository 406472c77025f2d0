//! Network identifier.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifies which network a deployment of the token targets.
///
/// The ledger itself is network-agnostic; the identifier only feeds
/// configuration defaults and log output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// Local development chain.
    Dev,
    /// The public test network.
    Testnet,
    /// The production network.
    Mainnet,
}

impl NetworkId {
    /// Chain id for this network.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Dev => 31337,
            Self::Testnet => 998,
            Self::Mainnet => 999,
        }
    }

    /// Default RPC endpoint.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Dev => "http://127.0.0.1:8545",
            Self::Testnet => "https://rpc.hyperliquid-testnet.xyz/evm",
            Self::Mainnet => "https://rpc.hyperliquid.xyz/evm",
        }
    }

    /// Block explorer base URL, if the network has one.
    pub fn explorer_url(&self) -> Option<&'static str> {
        match self {
            Self::Dev => None,
            Self::Testnet => Some("https://testnet.purrsec.com"),
            Self::Mainnet => Some("https://explorer.hyperliquid.xyz"),
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }
}

impl FromStr for NetworkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "local" => Ok(Self::Dev),
            "test" | "testnet" => Ok(Self::Testnet),
            "main" | "mainnet" | "live" => Ok(Self::Mainnet),
            other => Err(format!("unknown network: {other}")),
        }
    }
}
