//! One-shot process execution.
//!
//! [`CommandRunner`] is the capability the launcher uses for short-lived node
//! invocations (`init`, `version`). [`SystemRunner`] backs it with
//! `std::process::Command`; tests substitute their own implementation.

use log::debug;
use std::process::Command;

/// Result of a one-shot invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Captured standard output
    pub stdout: String,
    /// Set when the process could not be started or exited unsuccessfully
    pub error: Option<String>,
}

impl ExecOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            error: Some(message.into()),
        }
    }
}

/// Runs a program to completion and captures its output
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> ExecOutput;
}

/// [`CommandRunner`] backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> ExecOutput {
        let command_line = format!("{} {}", program, args.join(" "));
        debug!("Executing: {}", command_line);

        let output = match Command::new(program).args(args).output() {
            Ok(output) => output,
            Err(e) => return ExecOutput::failed(format!("Command failed: {}\n{}", command_line, e)),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let error = if output.status.success() {
            None
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Some(format!("Command failed: {}\n{}", command_line, stderr.trim()))
        };

        ExecOutput { stdout, error }
    }
}
