//! Watcher configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Watcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// URL of the console page being observed.
    #[serde(default = "default_page_url")]
    pub page_url: String,

    /// API base for key acquisition. When unset, it is derived from the
    /// console origin.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Whether to fetch the private key once both credential halves are
    /// known.
    #[serde(default = "default_fetch_keys")]
    pub fetch_keys: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            api_base: None,
            fetch_keys: default_fetch_keys(),
        }
    }
}

fn default_page_url() -> String {
    crate::env::PROD_PAGE_PREFIX.to_string()
}

fn default_fetch_keys() -> bool {
    true
}

impl WatcherConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Self = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }
}
