//! Node start orchestration.
//!
//! This module coordinates the full start sequence, from the loaded
//! configuration through a running, provisioned node:
//!
//! 1. resolve the configuration and locate the node binary ([`prepare`])
//! 2. probe the node version
//! 3. initialize the data directory (idempotent)
//! 4. spawn `lightchain run` and wait for both endpoints
//! 5. provision accounts over RPC
//!
//! Failures in steps 3 and 4 abort the start. A provisioning failure is logged
//! and reported in [`LaunchedNode::provisioning`], but the node keeps running.

use crate::accounts::{provision, ProvisioningError, ProvisioningPolicy, ProvisioningReport};
use crate::config::{Config, DEFAULT_BIN};
use crate::config_loader::load_policy;
use crate::process::{
    build, initialize, probe_version, CommandKind, CommandRunner, NodeProcess, NodeVersion,
    MIN_SUPPORTED_VERSION,
};
use crate::resolver::{resolve, NodeConfig};
use crate::rpc::AccountRpc;
use crate::utils::binary::validate_binary_spec;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{error, info, warn};
use std::path::Path;
use std::time::Duration;

/// Command-line overrides applied on top of the configuration file
#[derive(Debug, Clone, Default)]
pub struct LaunchOverrides {
    pub development: bool,
    pub bin: Option<String>,
    pub skip_accounts: bool,
}

/// Everything needed to start the node
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    pub binary: String,
    pub node: NodeConfig,
    pub policy: Option<ProvisioningPolicy>,
    pub startup_timeout: Duration,
}

/// A node that reached readiness
#[derive(Debug)]
pub struct LaunchedNode {
    pub process: NodeProcess,
    pub version: NodeVersion,
    pub provisioning: Result<ProvisioningReport, ProvisioningError>,
}

/// Resolve the configuration into [`LaunchSettings`].
pub fn prepare(
    config: &Config,
    config_path: &Path,
    overrides: &LaunchOverrides,
) -> Result<LaunchSettings> {
    let is_development = overrides.development || config.is_development();
    info!(
        "Environment: {}",
        if is_development { "development" } else { "production" }
    );

    let resolution = resolve(&config.node, is_development);
    resolution.log_warnings();

    let bin_spec = overrides
        .bin
        .as_deref()
        .or(config.node.bin.as_deref())
        .unwrap_or(DEFAULT_BIN);
    let binary = validate_binary_spec(bin_spec)
        .wrap_err_with(|| format!("Cannot use node binary '{}'", bin_spec))?;

    let policy = if overrides.skip_accounts {
        None
    } else {
        load_policy(config, config_path)?
    };

    Ok(LaunchSettings {
        binary: binary.display().to_string(),
        node: resolution.config,
        policy,
        startup_timeout: config.general.startup_timeout,
    })
}

/// Run the start sequence.
///
/// `runner` executes the one-shot `version` and `init` invocations; `rpc` is
/// only used once the node reports both endpoints open.
pub fn launch<R, A>(settings: &LaunchSettings, runner: &R, rpc: &A) -> Result<LaunchedNode>
where
    R: CommandRunner + ?Sized,
    A: AccountRpc + ?Sized,
{
    let version = probe_version(runner, &settings.binary);
    if version.is_supported() {
        info!("Lightchain version {}", version);
    } else {
        warn!(
            "Lightchain version {} is not supported, {} or newer is required",
            version, MIN_SUPPORTED_VERSION
        );
    }

    initialize(runner, &settings.binary, &settings.node)?;

    let args = build(CommandKind::Run, &settings.node);
    let mut process = NodeProcess::spawn(&settings.binary, &args)?;
    process
        .wait_until_ready(settings.startup_timeout)
        .wrap_err("Node failed to start")?;

    let provisioning = provision(rpc, settings.policy.as_ref(), settings.node.is_development);
    match &provisioning {
        Ok(report) if settings.policy.is_some() => info!(
            "Account provisioning complete: {} created, {} unlocked",
            report.created.len(),
            report.unlocked.len()
        ),
        Ok(_) => {}
        Err(e) => error!("Account provisioning failed, the node keeps running: {}", e),
    }

    Ok(LaunchedNode {
        process,
        version,
        provisioning,
    })
}
