//! Process type definitions.
//!
//! This file contains the node sub-commands the launcher invokes.

/// Node sub-command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// One-shot data directory initialization
    Init,
    /// Long-running node
    Run,
}

impl CommandKind {
    /// Get the verb passed as the first argument to the node binary
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Init => "init",
            CommandKind::Run => "run",
        }
    }
}
