//! Response envelope.
//!
//! # Responsibilities
//! - Hold the raw body, status, headers and originating request of every call
//! - Classify 2xx as success; everything else becomes `ApiError::Status`
//!   that still carries the envelope
//! - Decode JSON payloads on demand

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::types::{ApiError, ApiResult};

/// Uniform result of every API operation, success or failure.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status of the final exchange.
    pub status: StatusCode,
    /// Response headers of the final exchange.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: String,
    /// Method of the request that produced this response.
    pub method: Method,
    /// URL of the request that produced this response.
    pub url: Url,
    /// Body the caller sent, if any.
    pub request_body: Option<String>,
}

impl ApiResponse {
    /// Drain a reqwest response into an envelope.
    pub(crate) async fn read(
        response: reqwest::Response,
        method: Method,
        request_body: Option<&[u8]>,
    ) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.text().await?;

        tracing::debug!(
            status = status.as_u16(),
            url = %url,
            bytes = body.len(),
            "Response body read"
        );

        Ok(Self {
            status,
            headers,
            body,
            method,
            url,
            request_body: request_body.map(|b| String::from_utf8_lossy(b).into_owned()),
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Ok for 2xx, otherwise a status error carrying this envelope.
    pub fn into_result(self) -> ApiResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                response: Box::new(self),
            })
        }
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|source| ApiError::Decode {
            source,
            response: Box::new(self.clone()),
        })
    }

    #[cfg(test)]
    pub(crate) fn synthetic(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.to_string(),
            method: Method::GET,
            url: Url::parse("http://localhost/api/v2").unwrap(),
            request_body: None,
        }
    }
}
