//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// Excluded path patterns that do not compile are only warned about; the
    /// strategy treats a broken pattern set as excluding nothing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_name` or `user_agent` is empty
    /// - `network_timeout_ms` is 0 or exceeds 5 minutes
    /// - `fetch_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_bytes` is 0 or exceeds 50MB
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_name.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_name".into(), reason: "must not be empty".into() });
        }

        if self.network_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "network_timeout_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.network_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "network_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.fetch_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.fetch_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.fetch_timeout_ms < self.network_timeout_ms {
            tracing::warn!(
                fetch_timeout_ms = self.fetch_timeout_ms,
                network_timeout_ms = self.network_timeout_ms,
                "fetch_timeout_ms is shorter than network_timeout_ms; \
                 the cache is only consulted after a transport failure"
            );
        }

        for pattern in &self.excluded_paths {
            if let Err(e) = regex::Regex::new(pattern) {
                tracing::warn!(%pattern, error = %e, "excluded path pattern does not compile; nothing will be excluded");
            }
        }

        Ok(())
    }
}
