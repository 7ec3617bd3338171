mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory holding tiltscroll settings, created on first use.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("No platform config directory for tiltscroll settings"))?
        .join("tiltscroll");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// `config.toml` inside [`config_dir`].
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Read the user's settings. A fresh install gets [`AppConfig::default`].
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path()?)
}

/// Persist settings where [`load_config`] will find them.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&config_path()?, config)
}

/// Load config from `path`, or return defaults if the file does not exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        info!(?path, "Loaded config");
        Ok(config)
    } else {
        info!(?path, "Config file absent, layout defaults apply");
        Ok(AppConfig::default())
    }
}

/// Write `config` as pretty TOML, replacing any existing file.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    info!(?path, "Saved config");
    Ok(())
}
