//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, concurrency > 0)
//! - Check the upstream endpoint and metrics address are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::AppConfig;

/// Lowest port accepted (exclusive). Ports at or below it are reserved for the system.
pub const MIN_PORT: u16 = 1024;
/// Highest port accepted (exclusive).
pub const MAX_PORT: u16 = 65535;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `listener.port`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Whether `port` is usable for the listener.
pub fn is_valid_port(port: u16) -> bool {
    port > MIN_PORT && port < MAX_PORT
}

/// Check every semantic constraint and collect all violations.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_valid_port(config.listener.port) {
        errors.push(ValidationError::new(
            "listener.port",
            format!(
                "{} is outside the allowed range ({}, {})",
                config.listener.port, MIN_PORT, MAX_PORT
            ),
        ));
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must be at least 1",
        ));
    }

    if config.upstream.concurrent_requests == 0 {
        errors.push(ValidationError::new(
            "upstream.concurrent_requests",
            "must be at least 1",
        ));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.timeout_secs",
            "must be at least 1",
        ));
    }

    match Url::parse(&config.upstream.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.endpoint",
            format!("unsupported URL scheme: {}", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "upstream.endpoint",
            format!("invalid URL: {}", e),
        )),
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
