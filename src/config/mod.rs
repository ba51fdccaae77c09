// Configuration module

mod models;

pub use models::*;

use crate::error::{AdapterError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AdapterConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    ///
    /// `GEMINI_API_KEY` / `GOOGLE_API_KEY` are honored as a fallback for
    /// the API key when no other source provides one.
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::with_name(&Self::default_config_path()).required(false))
            // Override with environment variables (prefix: AGENT2GEMINI_)
            .add_source(Environment::with_prefix("AGENT2GEMINI").separator("__"))
            .build()
            .map_err(|e| AdapterError::Configuration(e.to_string()))?;

        let mut loaded: Self = config
            .try_deserialize()
            .map_err(|e| AdapterError::Configuration(e.to_string()))?;

        if loaded.credentials.api_key.is_none() {
            loaded.credentials.api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok();
        }

        Ok(loaded)
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".agent2gemini")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
