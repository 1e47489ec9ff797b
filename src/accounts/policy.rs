//! Provisioning policy derived from the `accounts` configuration section.

use crate::config::AccountsSection;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors building a [`ProvisioningPolicy`]
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Failed to read password file {path}: {source}")]
    PasswordFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What the provisioner should ensure for one run; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningPolicy {
    pub target_count: usize,
    pub password_source: Option<PathBuf>,
    /// May be empty: unlocking then warns, creating accounts fails
    pub password: String,
    /// Seconds; 0 means no expiry
    pub unlock_duration: u64,
}

impl ProvisioningPolicy {
    /// Build the policy, reading the password file if one is configured.
    ///
    /// Relative password paths are resolved against `base_dir`.
    pub fn from_section(section: &AccountsSection, base_dir: &Path) -> Result<Self, PolicyError> {
        let password_source = section.password_file.as_ref().map(|p| base_dir.join(p));
        let password = match &password_source {
            Some(path) => read_password(path)?,
            None => String::new(),
        };

        Ok(Self {
            target_count: section.count as usize,
            password_source,
            password,
            unlock_duration: section.unlock_duration,
        })
    }
}

/// Only the trailing line break is stripped; other whitespace is part of the password
fn read_password(path: &Path) -> Result<String, PolicyError> {
    let content = fs::read_to_string(path).map_err(|source| PolicyError::PasswordFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.trim_end_matches(['\r', '\n']).to_string())
}
