//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Without a key the application serves deterministic content only.
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub content_model: String,
    pub chapter_model: String,
    pub provider_timeout: Duration,
    pub cache_ttl_secs: i64,
    pub allowed_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        // --- Content Provider Settings ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());
        let openai_base_url = lookup("OPENAI_BASE_URL");
        let content_model =
            lookup("CONTENT_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let chapter_model = lookup("CHAPTER_MODEL").unwrap_or_else(|| "gpt-4o".to_string());

        let provider_timeout_secs = parse_positive(&lookup, "PROVIDER_TIMEOUT_SECS", 30)?;
        let cache_ttl_secs = parse_positive(&lookup, "CACHE_TTL_SECS", 3600)?;

        Ok(Self {
            bind_address,
            log_level,
            openai_api_key,
            openai_base_url,
            content_model,
            chapter_model,
            provider_timeout: Duration::from_secs(provider_timeout_secs as u64),
            cache_ttl_secs,
            allowed_origin,
        })
    }
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not a positive number of seconds", raw),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.provider_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl_secs, 3600);
    }

    #[test]
    fn blank_api_key_means_no_provider() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            config_from(&[("BIND_ADDRESS", "nowhere")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "BIND_ADDRESS"
        ));
        assert!(matches!(
            config_from(&[("CACHE_TTL_SECS", "0")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "CACHE_TTL_SECS"
        ));
    }
}
