//! Config loader — reads and writes `~/.polychat/config.yaml`.
//!
//! # Loading rules
//! - Missing file → `Config::default()` (first run works out of the box)
//! - Unreadable or malformed file → error. A corrupt config silently
//!   replaced by defaults would re-enable models the user disabled, so it
//!   is surfaced instead of papered over.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::schema::Config;
use super::ConfigError;

/// Default config file path (`~/.polychat/config.yaml`).
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.yaml")
}

/// Load configuration from the given path, or the default path if `None`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        info!("no config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("loading config from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Save configuration to disk as YAML, creating parent directories.
pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), ConfigError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
    }

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&config_path, yaml).map_err(|source| ConfigError::Write {
        path: config_path.clone(),
        source,
    })?;

    debug!("config saved to {}", config_path.display());
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
