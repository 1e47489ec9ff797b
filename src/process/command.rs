//! Node command-line construction.
//!
//! Builds the argument list for `lightchain init` and `lightchain run` from a
//! resolved [`NodeConfig`]. Argument construction is pure: equal configs always
//! give identical token sequences. Exposure warnings (CORS, WebSocket origins)
//! are computed separately by [`warnings_for`] and only logged by [`build`].

use crate::process::types::CommandKind;
use crate::resolver::{ConfigWarning, NetworkType, NodeConfig};
use log::warn;

/// Build the node arguments and log any exposure warnings.
pub fn build(kind: CommandKind, config: &NodeConfig) -> Vec<String> {
    for warning in warnings_for(kind, config) {
        warn!("{}", warning);
    }
    build_args(kind, config)
}

/// Build the node arguments without side effects.
///
/// # Ordering for `run`
///
/// 1. `run`
/// 2. common options (`--datadir`, `--lvl`)
/// 3. tendermint messaging ports
/// 4. RPC options, always present
/// 5. WebSocket options, only when enabled
/// 6. `--trace` when VM debugging is on
/// 7. `--rpcapi`
/// 8. `--wsapi`
///
/// `init` takes the network flag followed by the common options.
pub fn build_args(kind: CommandKind, config: &NodeConfig) -> Vec<String> {
    let mut args = vec![kind.as_str().to_string()];

    match kind {
        CommandKind::Init => {
            args.push(network_flag(config));
            args.extend(common_options(config));
        }
        CommandKind::Run => {
            args.extend(common_options(config));
            args.extend(messaging_port_options(config));
            args.extend(rpc_options(config));
            args.extend(ws_options(config));
            if config.vm_debug {
                args.push("--trace".to_string());
            }
            args.push(format!("--rpcapi={}", config.rpc.api.joined()));
            args.push(format!("--wsapi={}", config.ws.api.joined()));
        }
    }

    args
}

/// Warnings raised by the options a command would expose
pub fn warnings_for(kind: CommandKind, config: &NodeConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    if kind == CommandKind::Init {
        return warnings;
    }

    match config.rpc.cors_domain.as_deref() {
        Some("*") => warnings.push(ConfigWarning::WildcardCorsDomain),
        Some(_) => {}
        None => warnings.push(ConfigWarning::MissingCorsDomain),
    }

    if config.ws.enabled {
        match config.ws.origins.as_deref() {
            Some("*") => warnings.push(ConfigWarning::WildcardWsOrigins),
            Some(_) => {}
            None => warnings.push(ConfigWarning::MissingWsOrigins),
        }
    }

    warnings
}

fn network_flag(config: &NodeConfig) -> String {
    if config.is_development {
        NetworkType::Standalone.flag()
    } else {
        config.network_type.flag()
    }
}

fn common_options(config: &NodeConfig) -> Vec<String> {
    let mut cmd = Vec::new();
    if let Some(dir) = &config.data_dir {
        cmd.push(format!("--datadir={}", dir.display()));
    }
    if let Some(level) = config.verbosity {
        cmd.push(format!("--lvl={}", level.as_str()));
    }
    cmd
}

fn messaging_port_options(config: &NodeConfig) -> Vec<String> {
    let ports = &config.messaging_ports;
    [
        ("tmt_p2p_port", ports.p2p),
        ("tmt_proxy_port", ports.proxy),
        ("tmt_rpc_port", ports.rpc),
    ]
    .into_iter()
    .filter_map(|(name, port)| port.map(|p| format!("--{}={}", name, p)))
    .collect()
}

fn rpc_options(config: &NodeConfig) -> Vec<String> {
    let rpc = &config.rpc;
    let mut cmd = vec![
        "--rpc".to_string(),
        format!("--rpcport={}", rpc.port),
        format!("--rpcaddr={}", rpc.host),
    ];
    if let Some(domain) = &rpc.cors_domain {
        cmd.push(format!("--rpccorsdomain={}", domain));
    }
    cmd
}

fn ws_options(config: &NodeConfig) -> Vec<String> {
    let ws = &config.ws;
    if !ws.enabled {
        return Vec::new();
    }
    let mut cmd = vec![
        "--ws".to_string(),
        format!("--wsport={}", ws.port),
        format!("--wsaddr={}", ws.host),
    ];
    if let Some(origins) = &ws.origins {
        cmd.push(format!("--wsorigins={}", origins));
    }
    cmd
}
