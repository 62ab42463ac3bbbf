//! Bootstrap configuration loading
//!
//! Configuration sources, highest priority first:
//! 1. Command-line arguments (handled by the service binary)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Built-in defaults
//!
//! A missing TOML file is not an error: a warning is logged and the
//! built-in defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable holding the search API key
pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";

/// Environment variable holding the Custom Search engine id
pub const ENV_CSE_ID: &str = "GOOGLE_CSE_ID";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Interface to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Search provider configuration (optional)
    #[serde(default)]
    pub search: SearchConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Search provider configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Google API key (`GOOGLE_API_KEY` takes precedence)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Custom Search engine id (`GOOGLE_CSE_ID` takes precedence)
    #[serde(default)]
    pub cse_id: Option<String>,

    /// Custom Search endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of result items passed to the ranking engine
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_results() -> usize {
    10
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logging: LoggingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cse_id: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
        }
    }
}

/// Default TOML location: `<config_dir>/medicate/<module_name>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("medicate").join(format!("{}.toml", module_name)))
}

/// Load TOML bootstrap configuration
///
/// Missing file → defaults (with a warning). Unreadable file → `Error::Io`,
/// malformed file → `Error::Config`.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        warn!("No configuration file location available, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Search API credentials after ENV/TOML resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCredentials {
    pub api_key: Option<String>,
    pub cse_id: Option<String>,
}

impl SearchCredentials {
    /// Both key and engine id are present
    pub fn is_complete(&self) -> bool {
        self.api_key.is_some() && self.cse_id.is_some()
    }
}

/// Resolve search credentials
///
/// **Priority:** ENV → TOML. Blank values are treated as absent.
pub fn resolve_search_credentials(toml_config: &TomlConfig) -> SearchCredentials {
    SearchCredentials {
        api_key: resolve_setting(ENV_API_KEY, toml_config.search.api_key.as_deref()),
        cse_id: resolve_setting(ENV_CSE_ID, toml_config.search.cse_id.as_deref()),
    }
}

fn resolve_setting(env_name: &str, toml_value: Option<&str>) -> Option<String> {
    let env_value = std::env::var(env_name).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML. Using environment (highest priority).",
            env_name
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable", env_name);
        return Some(value);
    }

    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", env_name);
        return Some(value.to_string());
    }

    warn!("{} not configured", env_name);
    None
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
