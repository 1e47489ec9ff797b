//! Node binary path resolution and validation utilities.
//!
//! This module handles resolving the node binary from a bare name (looked up
//! on `PATH`) or an explicit path, and validating that it exists and is
//! executable.

use std::env;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Errors that can occur during binary resolution or validation
#[derive(Debug, thiserror::Error)]
pub enum BinaryError {
    #[error("Binary not found: {path}")]
    NotFound { path: String },

    #[error("Binary is not executable: {path}")]
    NotExecutable { path: String },

    #[error("Cannot determine home directory")]
    NoHomeDir,
}

/// Get the user's home directory from the HOME environment variable
fn get_home_dir() -> Result<PathBuf, BinaryError> {
    env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| BinaryError::NoHomeDir)
}

/// Resolve a binary path from a bare name or explicit path.
///
/// Resolution rules:
/// 1. If path contains `/` or starts with `~`: treat as explicit path
/// 2. Otherwise: search the directories listed in `PATH`
///
/// The `~` is expanded to the user's home directory.
///
/// # Examples
///
/// ```ignore
/// resolve_binary_path("lightchain") -> /usr/local/bin/lightchain
/// resolve_binary_path("~/go/bin/lightchain") -> /home/user/go/bin/lightchain
/// resolve_binary_path("/opt/lightchain/lightchain") -> /opt/lightchain/lightchain
/// ```
pub fn resolve_binary_path(name_or_path: &str) -> Result<PathBuf, BinaryError> {
    if let Some(rest) = name_or_path.strip_prefix("~/") {
        return Ok(get_home_dir()?.join(rest));
    }
    if name_or_path == "~" {
        return get_home_dir();
    }
    if name_or_path.contains('/') {
        return Ok(PathBuf::from(name_or_path));
    }

    let search_path = env::var_os("PATH").unwrap_or_default();
    env::split_paths(&search_path)
        .map(|dir| dir.join(name_or_path))
        .find(|candidate| validate_binary(candidate).is_ok())
        .ok_or_else(|| BinaryError::NotFound {
            path: name_or_path.to_string(),
        })
}

/// Validate that a binary exists and is executable.
///
/// This should be called before the first node invocation to catch
/// configuration errors early.
pub fn validate_binary(path: &Path) -> Result<(), BinaryError> {
    let metadata = path.metadata().map_err(|_| BinaryError::NotFound {
        path: path.display().to_string(),
    })?;

    // Check if file is executable (any execute bit set)
    let mode = metadata.permissions().mode();
    if !metadata.is_file() || mode & 0o111 == 0 {
        return Err(BinaryError::NotExecutable {
            path: path.display().to_string(),
        });
    }

    Ok(())
}

/// Validate a binary specified by name or path.
///
/// Combines resolution and validation in one step.
pub fn validate_binary_spec(name_or_path: &str) -> Result<PathBuf, BinaryError> {
    let resolved = resolve_binary_path(name_or_path)?;
    validate_binary(&resolved)?;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_name_on_path() {
        let result = resolve_binary_path("sh").unwrap();
        assert!(result.ends_with("sh"));
        assert!(result.is_absolute());
    }

    #[test]
    fn test_resolve_unknown_name() {
        let err = resolve_binary_path("lightchain-does-not-exist-anywhere").unwrap_err();
        assert!(matches!(err, BinaryError::NotFound { .. }));
    }

    #[test]
    fn test_resolve_explicit_tilde() {
        let result = resolve_binary_path("~/go/bin/lightchain").unwrap();
        assert!(result.ends_with("go/bin/lightchain"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn test_resolve_explicit_absolute() {
        let result = resolve_binary_path("/opt/lightchain/lightchain").unwrap();
        assert_eq!(result, PathBuf::from("/opt/lightchain/lightchain"));
    }

    #[test]
    fn test_validate_permissions() {
        let file = NamedTempFile::new().unwrap();
        let err = validate_binary(file.path()).unwrap_err();
        assert!(matches!(err, BinaryError::NotExecutable { .. }));

        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o755)).unwrap();
        assert!(validate_binary(file.path()).is_ok());
    }

    #[test]
    fn test_validate_missing_and_directory() {
        assert!(matches!(
            validate_binary(Path::new("/nonexistent/lightchain")),
            Err(BinaryError::NotFound { .. })
        ));
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_binary_spec(&dir.path().display().to_string()).is_err());
    }
}
