//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port > 0, backoff > 0)
//! - Check the proxy URL parses before any connection is attempted
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.host must not be empty")]
    MissingHost,

    #[error("server.port must be greater than 0")]
    InvalidPort,

    #[error("server.scheme must be http or https, got '{0}'")]
    InvalidScheme(String),

    #[error("server.proxy '{0}' is not a valid URL")]
    InvalidProxy(String),

    #[error("credentials.{0} must not be empty")]
    MissingCredential(&'static str),

    #[error("requests.rate_limit_backoff_secs must be greater than 0")]
    ZeroBackoff,

    #[error("requests.async_threshold must be greater than 0")]
    ZeroAsyncThreshold,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.server.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }
    if config.server.scheme != "https" && config.server.scheme != "http" {
        errors.push(ValidationError::InvalidScheme(config.server.scheme.clone()));
    }
    if let Some(proxy) = &config.server.proxy {
        if url::Url::parse(proxy).is_err() {
            errors.push(ValidationError::InvalidProxy(proxy.clone()));
        }
    }

    if config.credentials.user.is_empty() {
        errors.push(ValidationError::MissingCredential("user"));
    }
    if config.credentials.key.is_empty() {
        errors.push(ValidationError::MissingCredential("key"));
    }

    if config.requests.rate_limit_backoff_secs == 0 {
        errors.push(ValidationError::ZeroBackoff);
    }
    if config.requests.async_threshold == 0 {
        errors.push(ValidationError::ZeroAsyncThreshold);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
