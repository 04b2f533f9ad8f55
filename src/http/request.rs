//! Request envelope.
//!
//! # Responsibilities
//! - Capture everything one API call needs: method, target, body, header
//!   overrides, async preference
//! - Reject malformed targets before any I/O
//! - Derive the API base URL that async locators are relative to

use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::api::types::{ApiError, ApiResult};

/// Header asking the server to defer processing to an async job.
pub const PREFER: &str = "prefer";
/// Value of [`PREFER`] for async requests.
pub const RESPOND_ASYNC: &str = "respond-async";

/// A single API call. Built once, never mutated while in flight.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Vec<u8>>,
    headers: Vec<(String, String)>,
    async_mode: bool,
}

impl ApiRequest {
    /// Create a request for an already-parsed URL.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            headers: Vec::new(),
            async_mode: false,
        }
    }

    /// Create a request, validating the target URL.
    pub fn parse(method: Method, url: &str) -> ApiResult<Self> {
        let parsed = Url::parse(url).map_err(|source| ApiError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self::new(method, parsed))
    }

    /// Attach a JSON body and the matching content type.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> ApiResult<Self> {
        let bytes = serde_json::to_vec(body).map_err(ApiError::Serialize)?;
        Ok(self
            .with_body(bytes)
            .with_header("Content-Type", "application/json"))
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header override. Later values for the same name win.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Request deferred processing through the async job protocol.
    pub fn with_async(mut self, async_mode: bool) -> Self {
        self.async_mode = async_mode;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn is_async(&self) -> bool {
        self.async_mode
    }

    /// `scheme://host[:port]/api/v2` of the target. Async `Location` headers
    /// and job result hrefs are relative to this.
    pub fn base_url(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}://{}:{}/api/v2", self.url.scheme(), host, port),
            None => format!("{}://{}/api/v2", self.url.scheme(), host),
        }
    }
}

/// Resolve an href returned by the server against a base URL.
pub fn join_href(base_url: &str, href: &str) -> ApiResult<Url> {
    let full = format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/'));
    Url::parse(&full).map_err(|source| ApiError::InvalidUrl { url: full, source })
}
