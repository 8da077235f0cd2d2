// Configuration module

mod models;

pub use models::*;

use crate::error::{GateError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Same as [`AppConfig::load`] with an explicit config file path.
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        let file = path
            .map(str::to_string)
            .unwrap_or_else(Self::default_config_path);

        let config = Config::builder()
            // Start with defaults
            .add_source(
                Config::try_from(&Self::default())
                    .map_err(|e| GateError::Config(e.to_string()))?,
            )
            // Load from config file if it exists
            .add_source(File::with_name(&file).required(false))
            // Override with environment variables (prefix: NL2FORMULA_)
            .add_source(Environment::with_prefix("NL2FORMULA").separator("_"))
            .build()
            .map_err(|e| GateError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| GateError::Config(e.to_string()))
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nl2formula")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
