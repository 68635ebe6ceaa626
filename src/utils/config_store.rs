//! ConfigStore - Local Configuration Storage

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{ENV_PORT, ENV_TOKEN};
use crate::domain::config::AppConfig;
use crate::error::{Error, Result};
use crate::helpers::get_or_create_config_dir;

const CONFIG_FILE: &str = "config.toml";

/// Path of the configuration file
pub fn config_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(CONFIG_FILE))
}

/// Load the configuration, applying environment overrides
pub fn load_config() -> Result<AppConfig> {
    let config = load_config_from(&config_path()?)?;
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Load a TOML config file; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save the configuration
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&config_path()?, config)
}

/// Save a TOML config file
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Apply `XCMD_PORT` / `XCMD_TOKEN` overrides read through `lookup`
pub fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
    if let Some(port) = lookup(ENV_PORT) {
        config.backend.port = port.trim().parse::<u16>().map_err(|e| Error::Invalid {
            message: format!("{ENV_PORT}={port}: {e}"),
        })?;
    }
    if let Some(token) = lookup(ENV_TOKEN) {
        config.backend.token = Some(token);
    }
    Ok(config)
}
