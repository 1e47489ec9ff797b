//! Raw configuration as read from the YAML file.
//!
//! These types mirror the document one-to-one and carry no normalization.
//! Network aliasing, verbosity mapping and API deduplication happen in
//! [`crate::resolver`], which turns a [`NodeSection`] into a `NodeConfig`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIN: &str = "lightchain";
pub const DEFAULT_RPC_HOST: &str = "localhost";
pub const DEFAULT_RPC_PORT: u16 = 8545;
pub const DEFAULT_WS_HOST: &str = "localhost";
pub const DEFAULT_WS_PORT: u16 = 8546;
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_RPC_API: &[&str] = &["eth", "web3", "net", "debug", "personal"];
pub const DEFAULT_WS_API: &[&str] = &["eth", "web3", "net", "debug", "pubsub", "personal"];
pub const DEFAULT_DEV_WS_API: &[&str] = &["eth", "web3", "net", "debug", "pubsub", "personal"];

/// Deployment environment of the node
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Top-level configuration document
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub node: NodeSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<AccountsSection>,
}

impl Config {
    /// Validate the configuration
    ///
    /// Only values the node could never be started with are rejected here.
    /// Everything else is normalized later by the resolver.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.startup_timeout.is_zero() {
            return Err(ValidationError::InvalidGeneral(
                "startup_timeout must be greater than zero".to_string(),
            ));
        }

        if let Some(bin) = &self.node.bin {
            if bin.trim().is_empty() {
                return Err(ValidationError::InvalidNode("bin cannot be empty".to_string()));
            }
        }

        if self.node.rpc.port == Some(0) {
            return Err(ValidationError::InvalidNode("rpc.port cannot be 0".to_string()));
        }
        if self.node.ws.port == Some(0) {
            return Err(ValidationError::InvalidNode("ws.port cannot be 0".to_string()));
        }

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.general.environment == Environment::Development
    }
}

/// Settings that concern the launcher rather than the node itself
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(with = "humantime_serde", default = "default_startup_timeout")]
    pub startup_timeout: Duration,
}

fn default_startup_timeout() -> Duration {
    DEFAULT_STARTUP_TIMEOUT
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }
}

/// Node section, before resolution
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NodeSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datadir: Option<PathBuf>,
    /// Kept as a raw YAML value: non-integers and out-of-range numbers mean "unset"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<serde_yaml::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<u64>,
    #[serde(default)]
    pub mine_when_needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_config: Option<ClientConfig>,
    #[serde(default)]
    pub rpc: RpcSection,
    #[serde(default)]
    pub ws: WsSection,
    #[serde(default)]
    pub vm_debug: bool,
}

/// Tendermint messaging ports
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmt_p2p_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmt_proxy_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmt_rpc_port: Option<u16>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RpcSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origins: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<Vec<String>>,
}

/// Node account provisioning settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccountsSection {
    #[serde(default)]
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
    /// Seconds; 0 asks the node for an unlock without expiry
    #[serde(default)]
    pub unlock_duration: u64,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid node configuration: {0}")]
    InvalidNode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let yaml = r#"
general:
  environment: production
  startup_timeout: "2m"
node:
  bin: "/opt/lightchain/bin/lightchain"
  datadir: "/tmp/lightchain"
  verbosity: 3
  network_type: testnet
  client_config:
    tmt_p2p_port: 26656
    tmt_rpc_port: 26657
  rpc:
    host: "0.0.0.0"
    port: 8545
    cors_domain: "http://localhost:8000"
    api: [eth, web3]
  ws:
    enabled: false
  vm_debug: true
accounts:
  count: 2
  password_file: "config/password"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.is_development());
        assert_eq!(config.general.startup_timeout, Duration::from_secs(120));
        assert_eq!(config.node.network_type.as_deref(), Some("testnet"));
        assert_eq!(config.node.client_config.as_ref().unwrap().tmt_proxy_port, None);
        assert_eq!(config.node.rpc.api, Some(vec!["eth".to_string(), "web3".to_string()]));
        assert_eq!(config.node.ws.enabled, Some(false));
        assert!(config.node.vm_debug);

        let accounts = config.accounts.unwrap();
        assert_eq!(accounts.count, 2);
        assert_eq!(accounts.unlock_duration, 0);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.is_development());
        assert_eq!(config.general.startup_timeout, DEFAULT_STARTUP_TIMEOUT);
        assert!(config.accounts.is_none());
        assert_eq!(config.node, NodeSection::default());
    }

    #[test]
    fn test_validation_errors() {
        let config: Config = serde_yaml::from_str("node:\n  bin: \"  \"\n").unwrap();
        assert!(config.validate().is_err());

        let config: Config = serde_yaml::from_str("node:\n  rpc:\n    port: 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rpc.port"));

        let config: Config = serde_yaml::from_str("general:\n  startup_timeout: \"0s\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_verbosity_is_kept_raw() {
        let config: Config = serde_yaml::from_str("node:\n  verbosity: \"loud\"\n").unwrap();
        assert_eq!(
            config.node.verbosity,
            Some(serde_yaml::Value::String("loud".to_string()))
        );
    }
}
