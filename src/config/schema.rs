//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the policy client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Server location and transport options (TLS, proxy).
    pub server: ServerConfig,

    /// Basic authentication credential pair.
    pub credentials: CredentialsConfig,

    /// Request lifecycle tuning (async mode, rate-limit backoff).
    pub requests: RequestConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ClientConfig {
    /// Base URL every API path is resolved against, e.g.
    /// `https://pce.example.com:8443/api/v2`.
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}/api/v2",
            self.server.scheme, self.server.host, self.server.port
        )
    }

    /// Prefix for organization-scoped endpoints.
    pub fn org_url(&self) -> String {
        format!("{}/orgs/{}", self.base_url(), self.server.org_id)
    }
}

/// Server location and transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name of the policy server (no scheme, no trailing slash).
    pub host: String,

    /// TCP port of the API.
    pub port: u16,

    /// URL scheme, `https` unless talking to a plain-text test server.
    pub scheme: String,

    /// Organization the credentials belong to.
    pub org_id: u32,

    /// Skip TLS certificate verification.
    pub disable_tls_checking: bool,

    /// Optional forward proxy (e.g., "http://proxy.internal:3128").
    pub proxy: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 8443,
            scheme: "https".to_string(),
            org_id: 1,
            disable_tls_checking: false,
            proxy: None,
        }
    }
}

/// API credential pair used for basic authentication.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CredentialsConfig {
    /// API key user name.
    pub user: String,

    /// API key secret.
    pub key: String,
}

/// Request lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Route every request through the async job protocol.
    pub force_async: bool,

    /// Number of retries after a 429 before giving up.
    pub rate_limit_max_retries: u32,

    /// Fixed pause between 429 retries, in seconds.
    pub rate_limit_backoff_secs: u64,

    /// Consecutive undecodable job-status payloads tolerated while polling.
    pub max_malformed_polls: u32,

    /// Collection size at which a synchronous fetch is re-issued as async.
    pub async_threshold: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            force_async: false,
            rate_limit_max_retries: 6,
            rate_limit_backoff_secs: 30,
            max_malformed_polls: 5,
            async_threshold: 500,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log every request/response pair.
    pub verbose: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verbose: false,
        }
    }
}
