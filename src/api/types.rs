//! Shared API types and error definitions.

use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::ApiResponse;

/// Opaque resource locator, used both as primary key and as relation pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Href(String);

impl Href {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Href {
    fn from(href: &str) -> Self {
        Self(href.to_string())
    }
}

impl From<String> for Href {
    fn from(href: String) -> Self {
        Self(href)
    }
}

/// `{"href": "..."}` object the API uses for embedded references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HrefRef {
    pub href: Href,
}

/// Policy version a security-policy object is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyStatus {
    Draft,
    Active,
}

impl PolicyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyStatus::Draft => "draft",
            PolicyStatus::Active => "active",
        }
    }
}

impl FromStr for PolicyStatus {
    type Err = ApiError;

    /// Case-insensitive; anything but draft/active is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(PolicyStatus::Draft),
            "active" => Ok(PolicyStatus::Active),
            _ => Err(ApiError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Policy status was not draft or active.
    #[error("invalid policy status '{0}': must be draft or active")]
    InvalidStatus(String),

    /// Target could not be parsed as a URL.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Header override name or value is not valid HTTP.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    /// An update was attempted on an object that has no href.
    #[error("object has no href; it must exist on the server before it can be updated")]
    MissingHref,

    /// Request body could not be encoded.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Connection, DNS or TLS failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered outside 200-299. The body is still available.
    #[error("http status code of {}", .response.status)]
    Status { response: Box<ApiResponse> },

    /// A 2xx body did not decode into the expected type.
    #[error("failed to decode response from {}: {source}", .response.url)]
    Decode {
        #[source]
        source: serde_json::Error,
        response: Box<ApiResponse>,
    },

    /// The async job protocol was violated.
    #[error("async protocol error: {0}")]
    Protocol(String),

    /// The server reported the async job as failed.
    #[error("async job {href} failed: {description}")]
    AsyncJobFailed { href: String, description: String },

    /// Still rate limited after every allowed retry.
    #[error("received {} 429 responses in a row; gave up after {retries} retries", .retries + 1)]
    RateLimitExhausted {
        retries: u32,
        response: Box<ApiResponse>,
    },
}

impl ApiError {
    /// Response envelope attached to this error, if the server answered.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            ApiError::Status { response }
            | ApiError::Decode { response, .. }
            | ApiError::RateLimitExhausted { response, .. } => Some(&**response),
            _ => None,
        }
    }

    /// HTTP status of the attached response, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status)
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
