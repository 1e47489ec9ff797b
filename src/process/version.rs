//! Node version probing.

use crate::process::runner::CommandRunner;
use log::debug;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Oldest node release the launcher's flags are known to work with
pub const MIN_SUPPORTED_VERSION: NodeVersion = NodeVersion::new(1, 3, 0);

/// Match: "Version: X.Y.Z"
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Version:\s*(\d+)\.(\d+)\.(\d+)").expect("Invalid version regex")
});

/// Three-component node version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl NodeVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse the output of `lightchain version`; unparseable output is 0.0.0.
    pub fn parse(output: &str) -> Self {
        VERSION_PATTERN
            .captures(output)
            .and_then(|caps| {
                Some(Self::new(
                    caps[1].parse().ok()?,
                    caps[2].parse().ok()?,
                    caps[3].parse().ok()?,
                ))
            })
            .unwrap_or_default()
    }

    pub fn is_supported(&self) -> bool {
        *self >= MIN_SUPPORTED_VERSION
    }
}

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Run `<bin> version` and parse the reported version.
pub fn probe_version<R: CommandRunner + ?Sized>(runner: &R, binary_path: &str) -> NodeVersion {
    let output = runner.run(binary_path, &["version".to_string()]);
    if let Some(error) = &output.error {
        debug!("Version probe failed: {}", error);
    }
    NodeVersion::parse(&output.stdout)
}
