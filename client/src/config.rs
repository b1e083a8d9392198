//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tappay_crypto::WalletFactory;
use tappay_gateway::{
    ChainGateway, LiveGateway, LiveSettings, MockGateway, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_WEI,
};
use tappay_nullables::NullRadio;
use tappay_transport::TagTransport;
use tappay_types::{Address, NetworkId, PrivateKey};
use tappay_utils::LogFormat;

use crate::{ClientError, Settings};

/// Which [`ChainGateway`] to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    Live,
    #[default]
    Mock,
}

/// Which radio stack backs the tag transport.
///
/// Host apps with real NFC hardware inject their own stack through
/// [`crate::PaymentClient::new`]; the config only covers the built-in ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadioMode {
    /// An in-memory tag, always in range.
    #[default]
    Simulated,
    /// No NFC at all; tag operations fail with `UnsupportedPlatform`.
    Unsupported,
}

/// Which wallet factory to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletMode {
    #[default]
    Secp256k1,
    Placeholder,
}

impl WalletMode {
    pub fn factory(&self) -> WalletFactory {
        match self {
            Self::Secp256k1 => WalletFactory::Secp256k1,
            Self::Placeholder => WalletFactory::Placeholder,
        }
    }
}

/// Configuration for a TapPay client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Which network to talk to.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// JSON-RPC endpoint; the network's public endpoint when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    #[serde(default)]
    pub gateway: GatewayMode,

    #[serde(default)]
    pub radio: RadioMode,

    #[serde(default)]
    pub wallet_factory: WalletMode,

    /// Contract exposing `sendPayment(address,uint256)`.
    #[serde(default = "default_payment_contract")]
    pub payment_contract: String,

    /// Token contract queried for balances; the network's stable token when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_contract: Option<String>,

    /// Hex key that signs live submissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_private_key: Option<String>,

    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,

    #[serde(default = "default_gas_price_wei")]
    pub gas_price_wei: u64,

    /// How long to wait for a tag, in milliseconds.
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,

    #[serde(default = "default_mock_submit_delay_ms")]
    pub mock_submit_delay_ms: u64,

    #[serde(default = "default_mock_history_delay_ms")]
    pub mock_history_delay_ms: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Alfajores
}

fn default_payment_contract() -> String {
    "0x1234567890123456789012345678901234567890".to_string()
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

fn default_gas_price_wei() -> u64 {
    DEFAULT_GAS_PRICE_WEI as u64
}

fn default_acquire_timeout_ms() -> u64 {
    30_000
}

fn default_mock_submit_delay_ms() -> u64 {
    2_000
}

fn default_mock_history_delay_ms() -> u64 {
    1_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Defaults, on the network the user picked in their settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            network: settings.network,
            ..Self::default()
        }
    }

    /// Load a TOML file over persisted settings: the settings' network
    /// applies unless the file names one itself.
    pub fn from_toml_file_over(
        path: impl AsRef<Path>,
        settings: &Settings,
    ) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str_over(&content, settings)
    }

    /// String form of [`ClientConfig::from_toml_file_over`].
    pub fn from_toml_str_over(s: &str, settings: &Settings) -> Result<Self, ClientError> {
        let table: toml::Table = toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))?;
        let names_network = table.contains_key("network");
        let mut config: Self = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ClientError::Config(e.to_string()))?;
        if !names_network {
            config.network = settings.network;
        }
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ClientError> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.default_rpc_url().to_string())
    }

    pub fn token_contract(&self) -> String {
        self.token_contract
            .clone()
            .unwrap_or_else(|| self.network.default_token_contract().to_string())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format)
    }

    /// Check the settings that would otherwise only fail at first use.
    pub fn validate(&self) -> Result<(), ClientError> {
        Address::parse(&self.payment_contract)
            .map_err(|e| ClientError::Config(format!("payment_contract: {e}")))?;
        Address::parse(&self.token_contract())
            .map_err(|e| ClientError::Config(format!("token_contract: {e}")))?;
        if self.acquire_timeout_ms == 0 {
            return Err(ClientError::Config("acquire_timeout_ms must be positive".into()));
        }
        if self.gateway == GatewayMode::Live {
            let key = self.demo_private_key.as_deref().ok_or_else(|| {
                ClientError::Config("live gateway needs demo_private_key".into())
            })?;
            PrivateKey::from_hex(key)
                .map_err(|e| ClientError::Config(format!("demo_private_key: {e}")))?;
        }
        Ok(())
    }

    /// Build the configured gateway.
    pub fn build_gateway(&self) -> Result<Arc<dyn ChainGateway>, ClientError> {
        match self.gateway {
            GatewayMode::Mock => Ok(Arc::new(MockGateway::new(
                Duration::from_millis(self.mock_submit_delay_ms),
                Duration::from_millis(self.mock_history_delay_ms),
            ))),
            GatewayMode::Live => {
                let signer = self
                    .demo_private_key
                    .as_deref()
                    .map(PrivateKey::from_hex)
                    .transpose()?;
                let gateway = LiveGateway::new(LiveSettings {
                    rpc_url: self.rpc_url(),
                    chain_id: self.network.chain_id(),
                    payment_contract: Address::parse(&self.payment_contract)?,
                    token_contract: Address::parse(&self.token_contract())?,
                    signer,
                    gas_limit: self.gas_limit,
                    gas_price_wei: u128::from(self.gas_price_wei),
                })?;
                Ok(Arc::new(gateway))
            }
        }
    }

    /// Build the configured tag transport.
    pub fn build_transport(&self) -> TagTransport {
        let transport = match self.radio {
            RadioMode::Simulated => TagTransport::new(Arc::new(NullRadio::new())),
            RadioMode::Unsupported => TagTransport::unsupported(),
        };
        transport.with_acquire_timeout(self.acquire_timeout())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            rpc_url: None,
            gateway: GatewayMode::default(),
            radio: RadioMode::default(),
            wallet_factory: WalletMode::default(),
            payment_contract: default_payment_contract(),
            token_contract: None,
            demo_private_key: None,
            gas_limit: default_gas_limit(),
            gas_price_wei: default_gas_price_wei(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            mock_submit_delay_ms: default_mock_submit_delay_ms(),
            mock_history_delay_ms: default_mock_history_delay_ms(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url())
            .field("gateway", &self.gateway)
            .field("radio", &self.radio)
            .field("wallet_factory", &self.wallet_factory)
            .field("payment_contract", &self.payment_contract)
            .field("token_contract", &self.token_contract())
            .field(
                "demo_private_key",
                &self.demo_private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gas_limit", &self.gas_limit)
            .field("gas_price_wei", &self.gas_price_wei)
            .field("acquire_timeout_ms", &self.acquire_timeout_ms)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}
