//! Configuration system — YAML schema, loading, and settings operations.
//!
//! # Usage
//! ```no_run
//! use polychat_core::config;
//!
//! let cfg = config::load_config(None).unwrap();
//! for model in cfg.enabled_models() {
//!     println!("{} ({})", model.display_name, model.provider_id);
//! }
//! ```

pub mod loader;
pub mod schema;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{Config, EnabledModel, ModelConfig, ModelParameters, ProviderConfig, UiConfig};

/// Errors raised by config loading, saving, and settings operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("unknown model '{model}' under provider '{provider}'")]
    UnknownModel { provider: String, model: String },

    #[error("provider '{0}' already exists")]
    DuplicateProvider(String),

    #[error("model '{model}' already exists under provider '{provider}'")]
    DuplicateModel { provider: String, model: String },
}
