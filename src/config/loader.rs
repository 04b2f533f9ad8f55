//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Forces every request through the async job protocol when set to `true`.
pub const FORCE_ASYNC_ENV: &str = "POLICY_CLIENT_FORCE_ASYNC";

/// Enables request/response diagnostics when set to `true`.
pub const VERBOSE_ENV: &str = "POLICY_CLIENT_VERBOSE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// Environment switches are applied on top of the file before validation.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ClientConfig = toml::from_str(&content)?;
    finalize(config, |name| std::env::var(name).ok())
}

/// Apply environment overrides, normalize and validate a parsed config.
///
/// `env` is injected so callers (and tests) control where switches come from.
pub fn finalize<F>(mut config: ClientConfig, env: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_switches(&mut config, env);
    config.server.host = normalize_host(&config.server.host);

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Turn on `force_async` and `verbose` when their environment switches are
/// set to `true`. Switches only ever enable; they never clear a setting.
pub fn apply_env_switches<F>(config: &mut ClientConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if env_enabled(env(FORCE_ASYNC_ENV)) {
        config.requests.force_async = true;
    }
    if env_enabled(env(VERBOSE_ENV)) {
        config.observability.verbose = true;
    }
}

fn env_enabled(value: Option<String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Strip the common mistakes people make when pasting a server address.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    host.strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host)
        .to_string()
}
