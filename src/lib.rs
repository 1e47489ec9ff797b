//! # Lightchain Launcher - managed Lightchain node subprocess
//!
//! This library runs a Lightchain blockchain node as a child process with a
//! typed configuration surface, readiness detection and post-start account
//! provisioning.
//!
//! ## Overview
//!
//! The launcher never implements the node itself. It translates a YAML
//! configuration into `lightchain init` / `lightchain run` command lines,
//! watches the node's output until the HTTP-RPC and WebSocket endpoints are
//! open, and then makes sure the requested node accounts exist and are
//! unlocked.
//!
//! ## Architecture
//!
//! - `config`: raw YAML configuration structures
//! - `config_loader`: configuration file and password file loading
//! - `resolver`: normalization into an immutable `NodeConfig`
//! - `process`: command building, `init`, version probe, readiness, node process
//! - `rpc`: the account RPC capability and its JSON-RPC over HTTP client
//! - `accounts`: well-known accounts, provisioning policy and provisioner
//! - `utils`: binary resolution helpers
//! - `orchestrator`: the start sequence tying everything together
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lightchain_launcher::orchestrator::{self, LaunchOverrides};
//! use lightchain_launcher::process::SystemRunner;
//! use lightchain_launcher::rpc::HttpAccountRpc;
//! use lightchain_launcher::config_loader;
//! use std::path::Path;
//!
//! let path = Path::new("lightchain.yaml");
//! let config = config_loader::load_config(path)?;
//! let settings = orchestrator::prepare(&config, path, &LaunchOverrides::default())?;
//! let rpc = HttpAccountRpc::new(settings.node.rpc_url())?;
//! let mut node = orchestrator::launch(&settings, &SystemRunner, &rpc)?;
//! node.process.wait()?;
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   environment: production
//!   startup_timeout: "60s"
//!
//! node:
//!   datadir: ".lightchain"
//!   verbosity: 3
//!   network_type: sirius
//!   rpc:
//!     port: 8545
//!     cors_domain: "http://localhost:8000"
//!   ws:
//!     port: 8546
//!     origins: "http://localhost:8000"
//!
//! accounts:
//!   count: 3
//!   password_file: "password"
//! ```
//!
//! ## Error Handling
//!
//! Each concern has its own `thiserror` error type. The orchestrator and the
//! binary return `color_eyre` results with context attached.

pub mod accounts;
pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod process;
pub mod resolver;
pub mod rpc;
pub mod utils;
