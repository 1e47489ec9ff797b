//! Data directory initialization.
//!
//! `lightchain init` refuses to touch an existing data directory. That refusal
//! is treated as success so the launcher can initialize before every run
//! without remembering whether it already did.

use crate::process::command::build;
use crate::process::runner::CommandRunner;
use crate::process::types::CommandKind;
use crate::resolver::NodeConfig;
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;

/// Initialization failed for a reason other than an existing data directory
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to initialize node: {message}")]
pub struct InitError {
    pub message: String,
}

/// Run `init` once against the configured data directory.
///
/// Succeeds when the node produced no output and no error, or when it reports
/// that the data directory already exists. Any other output is an error
/// carrying the node's raw message.
pub fn initialize<R: CommandRunner + ?Sized>(
    runner: &R,
    binary_path: &str,
    config: &NodeConfig,
) -> Result<(), InitError> {
    let args = build(CommandKind::Init, config);
    let output = runner.run(binary_path, &args);

    if output.error.is_none() && output.stdout.trim().is_empty() {
        info!("Node data directory initialized");
        return Ok(());
    }

    let error_text = output.error.as_deref().unwrap_or_default();
    if reports_existing_datadir(error_text, config)
        || reports_existing_datadir(&output.stdout, config)
    {
        debug!("Node data directory already initialized");
        return Ok(());
    }

    let message = match output.error {
        Some(error) => error,
        None => output.stdout,
    };
    Err(InitError { message })
}

/// Match: "unable to initialize lightchain node. <DATADIR> already exists"
static ALREADY_INITIALIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"unable to initialize \S+ node\. (.+?) already exists")
        .expect("Invalid already_initialized regex")
});

/// Without a configured data directory any reported path counts.
fn reports_existing_datadir(text: &str, config: &NodeConfig) -> bool {
    ALREADY_INITIALIZED.captures_iter(text).any(|caps| match &config.data_dir {
        Some(dir) => caps[1] == dir.display().to_string(),
        None => true,
    })
}
