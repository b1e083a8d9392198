//! Network identifier.

use serde::{Deserialize, Serialize};

/// Identifies which chain the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The Alfajores public test network.
    Alfajores,
    /// The production network.
    Mainnet,
    /// A local development chain.
    Dev,
}

impl NetworkId {
    /// EIP-155 chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Alfajores => 44787,
            Self::Mainnet => 42220,
            Self::Dev => 1337,
        }
    }

    /// Default JSON-RPC endpoint.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Alfajores => "https://alfajores-forno.celo-testnet.org",
            Self::Mainnet => "https://forno.celo.org",
            Self::Dev => "http://127.0.0.1:8545",
        }
    }

    /// Native token contract used for balance queries.
    pub fn default_token_contract(&self) -> &'static str {
        match self {
            Self::Alfajores => "0xF194afDf50B03e69Bd7D057c1Aa9e10c9954E4C9",
            Self::Mainnet => "0x471EcE3750Da237f93B8E339c536989b8978a438",
            Self::Dev => "0x0000000000000000000000000000000000000000",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alfajores => "alfajores",
            Self::Mainnet => "mainnet",
            Self::Dev => "dev",
        }
    }

    /// Parse a network name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "alfajores" | "testnet" => Some(Self::Alfajores),
            "mainnet" | "live" => Some(Self::Mainnet),
            "dev" | "local" => Some(Self::Dev),
            _ => None,
        }
    }
}
