//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (NETFIRST_*)
//! 2. TOML config file (if NETFIRST_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (NETFIRST_*)
/// 2. TOML config file (if NETFIRST_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Enables diagnostic (debug level) logging.
    ///
    /// Set via NETFIRST_DEBUG environment variable.
    #[serde(default)]
    pub debug: bool,

    /// URLs fetched and stored by `precache`.
    ///
    /// Set via NETFIRST_RESOURCES environment variable (`[a, b]` list syntax).
    #[serde(default)]
    pub resources: Vec<String>,

    /// Base URL that relative resource paths and request targets resolve against.
    ///
    /// Set via NETFIRST_BASE_URL environment variable.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Regex patterns; requests whose URL matches any of them bypass the cache.
    ///
    /// Set via NETFIRST_EXCLUDED_PATHS environment variable (`[a, b]` list syntax).
    #[serde(default)]
    pub excluded_paths: Vec<String>,

    /// Name of the persistent cache network responses are written to.
    ///
    /// Set via NETFIRST_CACHE_NAME environment variable.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Milliseconds the network gets before the cache is consulted.
    ///
    /// Set via NETFIRST_NETWORK_TIMEOUT_MS environment variable.
    #[serde(default = "default_network_timeout_ms")]
    pub network_timeout_ms: u64,

    /// Path to SQLite cache database.
    ///
    /// Set via NETFIRST_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via NETFIRST_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via NETFIRST_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Hard transport timeout in milliseconds.
    ///
    /// Set via NETFIRST_FETCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum number of redirects to follow.
    ///
    /// Set via NETFIRST_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_cache_name() -> String {
    "netfirst-offline".into()
}

fn default_network_timeout_ms() -> u64 {
    4_000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./netfirst-cache.sqlite")
}

fn default_user_agent() -> String {
    "netfirst/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_fetch_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            resources: Vec::new(),
            base_url: None,
            excluded_paths: Vec::new(),
            cache_name: default_cache_name(),
            network_timeout_ms: default_network_timeout_ms(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// The immutable slice of configuration the request strategy is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    pub cache_name: String,
    pub network_timeout: Duration,
    pub excluded_paths: Vec<String>,
    pub resources: Vec<String>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        AppConfig::default().strategy()
    }
}

impl AppConfig {
    /// Race timeout as Duration.
    pub fn network_timeout(&self) -> Duration {
        Duration::from_millis(self.network_timeout_ms)
    }

    /// Transport timeout as Duration for use with reqwest.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn strategy(&self) -> StrategyConfig {
        StrategyConfig {
            cache_name: self.cache_name.clone(),
            network_timeout: self.network_timeout(),
            excluded_paths: self.excluded_paths.clone(),
            resources: self.resources.clone(),
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `NETFIRST_`
    /// 2. TOML file from `NETFIRST_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("NETFIRST_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("NETFIRST_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
