use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use lightchain_launcher::config_loader;
use lightchain_launcher::orchestrator::{self, LaunchOverrides};
use lightchain_launcher::process::SystemRunner;
use lightchain_launcher::rpc::HttpAccountRpc;
use log::{info, warn};
use std::path::PathBuf;

/// Launches a Lightchain node and provisions its accounts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the launcher configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Run in development mode (standalone network, development account)
    #[arg(long)]
    dev: bool,

    /// Node binary name or path, overriding the configuration
    #[arg(long)]
    bin: Option<String>,

    /// Do not create or unlock node accounts
    #[arg(long)]
    skip_accounts: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Configuration file: {:?}", args.config);
    let config = config_loader::load_config(&args.config)?;

    let overrides = LaunchOverrides {
        development: args.dev,
        bin: args.bin,
        skip_accounts: args.skip_accounts,
    };
    let settings = orchestrator::prepare(&config, &args.config, &overrides)?;
    let rpc = HttpAccountRpc::new(settings.node.rpc_url())?;

    let mut node = orchestrator::launch(&settings, &SystemRunner, &rpc)?;
    info!("Node running (pid {}), RPC at {}", node.process.id(), rpc.url());

    let status = node.process.wait().wrap_err("Failed to wait for node")?;
    if status.success() {
        info!("Node exited");
        Ok(())
    } else {
        warn!("Node exited with {}", status);
        std::process::exit(status.code().unwrap_or(1));
    }
}
