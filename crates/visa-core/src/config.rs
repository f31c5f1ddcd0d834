//! Client configuration.
//!
//! Resolution priority (highest first):
//! 1. Explicit overrides from the command line
//! 2. Environment variable `VISA_ANALYZER_URL`
//! 3. `~/.config/visa-assistant/config.toml`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VisaError};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/analyze-message";
pub const ENDPOINT_ENV_VAR: &str = "VISA_ANALYZER_URL";

const CONFIG_DIR_NAME: &str = "visa-assistant";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the analyzer's `analyze-message` route.
    pub endpoint: String,
    /// Overrides the default `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Loads the config file at the default location, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let config = match default_config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Loads a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies environment overrides using the given lookup.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Rejects configurations that cannot produce a request.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(VisaError::config("endpoint must not be empty"));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(VisaError::config(format!(
                "endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        Ok(())
    }
}

/// Returns `~/.config/visa-assistant/config.toml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    })
}
