//! Client configuration
//!
//! Values come from built-in defaults, an optional configuration file
//! (YAML, TOML or JSON, picked by extension) and `ESTORE__*` environment
//! variables, in that order of precedence.

use crate::error::{ClientError, Result};
use crate::provider::FALLBACK_ENDPOINT;
use crate::seed::SettlePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Longest accepted seed window, ten years in seconds
pub const MAX_WINDOW_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Prefix of environment overrides, e.g. `ESTORE__PROVIDER__URL`
pub const ENV_PREFIX: &str = "ESTORE";

/// Top level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger provider settings
    pub provider: ProviderConfig,
    /// Contract binding settings
    pub contract: ContractConfig,
    /// Seeding run settings
    pub seed: SeedConfig,
    /// Off-chain asset store endpoint
    pub offchain_store: OffchainStoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Injected provider endpoint. When unset the fallback is used.
    pub url: Option<String>,
    /// Endpoint of the local development network
    pub fallback_url: String,
    /// Polling interval for pending transactions, in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            url: None,
            fallback_url: FALLBACK_ENDPOINT.to_string(),
            poll_interval_ms: 250,
        }
    }
}

impl ProviderConfig {
    /// Parsed fallback endpoint
    pub fn fallback_endpoint(&self) -> Result<Url> {
        Url::parse(&self.fallback_url)
            .map_err(|e| ClientError::Config(format!("invalid fallback_url {}: {}", self.fallback_url, e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Contract name as recorded in the artifact
    pub name: String,
    /// Path to the truffle build artifact
    pub artifact_path: PathBuf,
    /// Deployed address override, bypasses the artifact's network table
    pub address: Option<String>,
    /// Network id override, bypasses `net_version`
    pub network_id: Option<String>,
    /// Sender account. Defaults to the node's first unlocked account.
    pub from: Option<String>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        ContractConfig {
            name: "EcommerceStore".to_string(),
            artifact_path: PathBuf::from("build/contracts/EcommerceStore.json"),
            address: None,
            network_id: None,
            from: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Distance between start and end time of every entry, in seconds
    pub window_secs: u64,
    /// Default price in ether, converted to wei once per batch
    pub price_ether: String,
    /// Default product status flag
    pub status: u64,
    /// Whether writes settle before the index read
    pub settle: SettlePolicy,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            window_secs: 300,
            price_ether: "1".to_string(),
            status: 0,
            settle: SettlePolicy::JoinWrites,
        }
    }
}

/// Content-addressed asset store endpoint. Configured only; nothing in
/// the seeding flow talks to it yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OffchainStoreConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
}

impl Default for OffchainStoreConfig {
    fn default() -> Self {
        OffchainStoreConfig {
            host: "localhost".to_string(),
            port: 5001,
            protocol: "http".to_string(),
        }
    }
}

impl OffchainStoreConfig {
    /// Base URL of the store's API
    pub fn api_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

impl Config {
    /// Load configuration from a file layered with environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Load configuration from an optional file layered with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        self.provider.fallback_endpoint()?;
        if let Some(url) = &self.provider.url {
            Url::parse(url).map_err(|e| ClientError::Config(format!("invalid provider url {}: {}", url, e)))?;
        }
        if self.contract.name.trim().is_empty() {
            return Err(ClientError::Config("contract name must not be empty".to_string()));
        }
        if self.seed.window_secs == 0 {
            return Err(ClientError::Config("seed window must be at least one second".to_string()));
        }
        if self.seed.window_secs > MAX_WINDOW_SECS {
            return Err(ClientError::Config(format!(
                "seed window of {} seconds exceeds the {} second limit",
                self.seed.window_secs, MAX_WINDOW_SECS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_local_development_setup() {
        let config = Config::default();
        assert_eq!(config.provider.fallback_url, "http://localhost:8545");
        assert!(config.provider.url.is_none());
        assert_eq!(config.contract.name, "EcommerceStore");
        assert_eq!(config.seed.window_secs, 300);
        assert_eq!(config.seed.price_ether, "1");
        assert_eq!(config.offchain_store.api_url(), "http://localhost:5001");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_file_keeps_other_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "provider:\n  url: \"http://127.0.0.1:7545\"\nseed:\n  window_secs: 600\n  settle: detached\n"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.provider.url.as_deref(), Some("http://127.0.0.1:7545"));
        assert_eq!(config.provider.fallback_url, "http://localhost:8545");
        assert_eq!(config.seed.window_secs, 600);
        assert_eq!(config.seed.settle, SettlePolicy::Detached);
        assert_eq!(config.offchain_store.port, 5001);
    }

    #[test]
    fn invalid_provider_url_is_rejected() {
        let mut config = Config::default();
        config.provider.url = Some("not a url".to_string());
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut config = Config::default();
        config.seed.window_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_window_is_rejected() {
        let mut config = Config::default();
        config.seed.window_secs = u64::MAX;
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));

        config.seed.window_secs = MAX_WINDOW_SECS;
        assert!(config.validate().is_ok());
        config.seed.window_secs = MAX_WINDOW_SECS + 1;
        assert!(config.validate().is_err());
    }
}
