mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Returns the config directory: <config_dir>/telemetry-dashboard/
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("telemetry-dashboard");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the config file path: <config_dir>/telemetry-dashboard/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config from disk, or return default if not found.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path()?)
}

/// Load config from `path`, or return default if the file does not exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.camera.validate()?;
        info!(?path, "Loaded config");
        Ok(config)
    } else {
        info!("No config found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Save config to disk.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(config, &config_path()?)
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    info!(?path, "Saved config");
    Ok(())
}
