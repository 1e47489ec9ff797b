//! Configuration resolution.
//!
//! Turns the raw [`NodeSection`] read from YAML into an immutable, fully
//! normalized [`NodeConfig`]. Resolution never fails: unknown values fall back
//! to defaults and anything worth an operator's attention is returned as a
//! [`ConfigWarning`] next to the resolved value.

use crate::config::{
    NodeSection, DEFAULT_DEV_WS_API, DEFAULT_RPC_API, DEFAULT_RPC_HOST, DEFAULT_RPC_PORT,
    DEFAULT_WS_API, DEFAULT_WS_HOST, DEFAULT_WS_PORT,
};
use log::warn;
use std::fmt;
use std::net::Ipv6Addr;
use std::path::PathBuf;

/// Network id the node uses on the Sirius test network
pub const SIRIUS_NETWORK_ID: u64 = 162;

/// Network the node joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkType {
    #[default]
    Standalone,
    Sirius,
    Mainnet,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Standalone => "standalone",
            NetworkType::Sirius => "sirius",
            NetworkType::Mainnet => "mainnet",
        }
    }

    /// Flag selecting this network on `init`
    pub fn flag(&self) -> String {
        format!("--{}", self.as_str())
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node log level, indexed 0 (crit) to 5 (trace)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Crit,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            0 => Some(Verbosity::Crit),
            1 => Some(Verbosity::Error),
            2 => Some(Verbosity::Warn),
            3 => Some(Verbosity::Info),
            4 => Some(Verbosity::Debug),
            5 => Some(Verbosity::Trace),
            _ => None,
        }
    }

    /// Interpret a raw YAML value; anything but a whole number in 0..=5 is unset.
    pub fn from_value(value: &serde_yaml::Value) -> Option<Self> {
        if let Some(level) = value.as_u64() {
            return Self::from_level(level);
        }
        value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && (0.0..=5.0).contains(v))
            .and_then(|v| Self::from_level(v as u64))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Crit => "crit",
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

/// Ordered set of RPC API namespaces
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiSet(Vec<String>);

impl ApiSet {
    /// Build from a list, keeping the first occurrence of each name.
    ///
    /// Returns the names that were dropped as duplicates.
    pub fn from_list<S: AsRef<str>>(items: &[S]) -> (Self, Vec<String>) {
        let mut names: Vec<String> = Vec::with_capacity(items.len());
        let mut duplicates = Vec::new();
        for item in items {
            let name = item.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if names.iter().any(|n| n == name) {
                duplicates.push(name.to_string());
            } else {
                names.push(name.to_string());
            }
        }
        (Self(names), duplicates)
    }

    /// Comma-joined form used on the command line
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

/// Tendermint ports; `None` means the node's own default is used
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessagingPorts {
    pub p2p: Option<u16>,
    pub proxy: Option<u16>,
    pub rpc: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    pub enabled: bool,
    pub port: u16,
    pub host: String,
    pub api: ApiSet,
    pub cors_domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsEndpoint {
    pub enabled: bool,
    pub port: u16,
    pub host: String,
    pub api: ApiSet,
    pub origins: Option<String>,
}

/// Fully resolved node configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub data_dir: Option<PathBuf>,
    pub verbosity: Option<Verbosity>,
    pub network_type: NetworkType,
    pub network_id: Option<u64>,
    pub messaging_ports: MessagingPorts,
    pub rpc: RpcEndpoint,
    pub ws: WsEndpoint,
    pub vm_debug: bool,
    pub is_development: bool,
}

impl NodeConfig {
    /// URL the launcher uses to reach the node's HTTP-RPC endpoint
    pub fn rpc_url(&self) -> String {
        format!("http://{}:{}", connect_host(&self.rpc.host), self.rpc.port)
    }
}

/// Wildcard bind addresses are not connectable; talk to loopback instead.
/// IPv6 literals are bracketed for use in a URL authority.
fn connect_host(host: &str) -> String {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    match bare {
        "" | "0.0.0.0" | "::" => "127.0.0.1".to_string(),
        other => match other.parse::<Ipv6Addr>() {
            Ok(addr) => format!("[{}]", addr),
            Err(_) => other.to_string(),
        },
    }
}

/// Non-fatal configuration findings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("Lightchain does not support the {0} testnet, using the Sirius network instead")]
    UnsupportedTestnet(String),
    #[error("Unknown network type '{0}', using standalone")]
    UnknownNetworkType(String),
    #[error("Duplicate {endpoint} api '{api}' ignored")]
    DuplicateApi {
        endpoint: &'static str,
        api: String,
    },
    #[error("RPC cannot be disabled, the node is always started with --rpc")]
    RpcForcedOn,
    #[error("Lightchain does not need a miner, remove the mine_when_needed setting")]
    MinerNotSupported,
    #[error("rpc cors_domain set to *, make sure you know what you are doing")]
    WildcardCorsDomain,
    #[error("rpc cors_domain is not set")]
    MissingCorsDomain,
    #[error("ws origins set to *, make sure you know what you are doing")]
    WildcardWsOrigins,
    #[error("ws origins is not set")]
    MissingWsOrigins,
    #[error("Unlocking accounts with a blank password")]
    BlankUnlockPassword,
}

/// Outcome of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: NodeConfig,
    pub warnings: Vec<ConfigWarning>,
}

impl Resolution {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

/// Resolve a raw node section into a [`NodeConfig`].
///
/// In development mode the configured network is ignored and the node always
/// runs standalone.
pub fn resolve(raw: &NodeSection, is_development: bool) -> Resolution {
    let mut warnings = Vec::new();

    let (network_type, network_id) = resolve_network(
        raw.network_type.as_deref(),
        raw.network_id,
        is_development,
        &mut warnings,
    );

    let verbosity = raw.verbosity.as_ref().and_then(Verbosity::from_value);

    let messaging_ports = raw
        .client_config
        .as_ref()
        .map(|c| MessagingPorts {
            p2p: c.tmt_p2p_port.filter(|p| *p != 0),
            proxy: c.tmt_proxy_port.filter(|p| *p != 0),
            rpc: c.tmt_rpc_port.filter(|p| *p != 0),
        })
        .unwrap_or_default();

    if raw.rpc.enabled == Some(false) {
        warnings.push(ConfigWarning::RpcForcedOn);
    }
    let rpc_api = resolve_api("rpc", raw.rpc.api.as_deref(), DEFAULT_RPC_API, &mut warnings);
    let rpc = RpcEndpoint {
        enabled: true,
        port: raw.rpc.port.unwrap_or(DEFAULT_RPC_PORT),
        host: non_empty(raw.rpc.host.as_deref()).unwrap_or(DEFAULT_RPC_HOST).to_string(),
        api: rpc_api,
        cors_domain: non_empty(raw.rpc.cors_domain.as_deref()).map(str::to_string),
    };

    let ws_defaults = if is_development { DEFAULT_DEV_WS_API } else { DEFAULT_WS_API };
    let ws_api = resolve_api("ws", raw.ws.api.as_deref(), ws_defaults, &mut warnings);
    let ws = WsEndpoint {
        enabled: raw.ws.enabled.unwrap_or(true),
        port: raw.ws.port.unwrap_or(DEFAULT_WS_PORT),
        host: non_empty(raw.ws.host.as_deref()).unwrap_or(DEFAULT_WS_HOST).to_string(),
        api: ws_api,
        origins: non_empty(raw.ws.origins.as_deref()).map(str::to_string),
    };

    if raw.mine_when_needed {
        warnings.push(ConfigWarning::MinerNotSupported);
    }

    Resolution {
        config: NodeConfig {
            data_dir: raw.datadir.clone().filter(|d| !d.as_os_str().is_empty()),
            verbosity,
            network_type,
            network_id,
            messaging_ports,
            rpc,
            ws,
            vm_debug: raw.vm_debug,
            is_development,
        },
        warnings,
    }
}

fn resolve_network(
    raw: Option<&str>,
    raw_id: Option<u64>,
    is_development: bool,
    warnings: &mut Vec<ConfigWarning>,
) -> (NetworkType, Option<u64>) {
    if is_development {
        return (NetworkType::Standalone, raw_id);
    }

    let name = raw.map(|s| s.trim().to_ascii_lowercase());
    match name.as_deref() {
        Some(legacy @ ("rinkeby" | "ropsten" | "kovan")) => {
            warnings.push(ConfigWarning::UnsupportedTestnet(legacy.to_string()));
            (NetworkType::Sirius, Some(SIRIUS_NETWORK_ID))
        }
        Some("testnet" | "sirius") => (NetworkType::Sirius, Some(SIRIUS_NETWORK_ID)),
        Some("livenet" | "mainnet") => (NetworkType::Mainnet, raw_id),
        None | Some("") | Some("standalone") => (NetworkType::Standalone, raw_id),
        Some(other) => {
            warnings.push(ConfigWarning::UnknownNetworkType(other.to_string()));
            (NetworkType::Standalone, raw_id)
        }
    }
}

fn resolve_api(
    endpoint: &'static str,
    configured: Option<&[String]>,
    defaults: &[&str],
    warnings: &mut Vec<ConfigWarning>,
) -> ApiSet {
    let (api, duplicates) = match configured {
        Some(list) => ApiSet::from_list(list),
        None => ApiSet::from_list(defaults),
    };
    warnings.extend(
        duplicates
            .into_iter()
            .map(|api| ConfigWarning::DuplicateApi { endpoint, api }),
    );
    api
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
