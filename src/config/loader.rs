//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{is_valid_port, validate_config, ValidationError};

pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_CONCURRENT_REQUESTS: &str = "CONCURRENT_REQUESTS";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ENDPOINT: &str = "APOD_ENDPOINT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Override config values from environment variables.
///
/// Unset variables are skipped silently; invalid ones are logged and the
/// current value is kept.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        if key.is_empty() {
            tracing::warn!(var = ENV_API_KEY, "Env var empty, keeping configured value");
        } else {
            config.upstream.api_key = key;
        }
    }

    if let Some(raw) = lookup(ENV_CONCURRENT_REQUESTS) {
        match raw.trim().parse::<usize>() {
            Ok(n) if n != 0 => config.upstream.concurrent_requests = n,
            _ => tracing::warn!(
                var = ENV_CONCURRENT_REQUESTS,
                value = %raw,
                default = config.upstream.concurrent_requests,
                "Env var invalid, keeping configured value"
            ),
        }
    }

    if let Some(raw) = lookup(ENV_PORT) {
        match raw.trim().parse::<u16>() {
            Ok(port) if is_valid_port(port) => config.listener.port = port,
            _ => tracing::warn!(
                var = ENV_PORT,
                value = %raw,
                default = config.listener.port,
                "Env var invalid, keeping configured value"
            ),
        }
    }

    if let Some(endpoint) = lookup(ENV_ENDPOINT) {
        if !endpoint.is_empty() {
            config.upstream.endpoint = endpoint;
        }
    }
}
