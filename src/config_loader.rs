use crate::accounts::ProvisioningPolicy;
use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Build the account provisioning policy, if the configuration asks for one.
///
/// Password files are resolved relative to the directory holding the
/// configuration file.
pub fn load_policy(config: &Config, config_path: &Path) -> Result<Option<ProvisioningPolicy>> {
    let Some(section) = &config.accounts else {
        return Ok(None);
    };
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let policy = ProvisioningPolicy::from_section(section, base_dir)?;
    info!(
        "Account provisioning: {} account(s), password {}",
        policy.target_count,
        if policy.password.is_empty() { "blank" } else { "set" }
    );
    Ok(Some(policy))
}
