//! Node process handling.
//!
//! This module covers everything the launcher does with the node binary:
//! building its command lines, running the one-shot `init` and `version`
//! invocations, and spawning the long-running node while watching its output
//! for readiness.

pub mod command;
pub mod init;
pub mod node;
pub mod readiness;
pub mod runner;
pub mod types;
pub mod version;

// Re-export commonly used items for convenience
pub use command::{build, build_args, warnings_for};
pub use init::{initialize, InitError};
pub use node::{NodeProcess, StartupError};
pub use readiness::{ReadinessClassifier, ReadinessState};
pub use runner::{CommandRunner, ExecOutput, SystemRunner};
pub use types::CommandKind;
pub use version::{probe_version, NodeVersion, MIN_SUPPORTED_VERSION};
