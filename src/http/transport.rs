//! Transport executor.
//!
//! # Responsibilities
//! - Build one reqwest client from the TLS and proxy settings
//! - Attach basic auth, caller headers and the async preference
//! - Drive the async poller when the server defers processing
//! - Normalize the final exchange into an `ApiResponse`
//!
//! # Design Decisions
//! - Transport failures abort immediately; retrying is the orchestrator's job
//! - No environment proxy is picked up unless one is configured explicitly
//! - Verbose diagnostics are `debug` events; nothing branches on them

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use url::Url;

use crate::api::types::{ApiError, ApiResult};
use crate::config::{ClientConfig, CredentialsConfig};
use crate::http::async_poll::{AsyncHint, AsyncPoller};
use crate::http::request::{join_href, ApiRequest, PREFER, RESPOND_ASYNC};
use crate::http::response::ApiResponse;
use crate::observability::metrics;
use crate::resilience::backoff::Sleeper;

/// Executes single API exchanges against the policy server.
pub struct Transport {
    client: reqwest::Client,
    credentials: CredentialsConfig,
    force_async: bool,
    max_malformed_polls: u32,
    sleeper: Arc<dyn Sleeper>,
}

impl Transport {
    /// Create a transport from configuration.
    ///
    /// # Errors
    /// Returns `ApiError::Transport` if the proxy or TLS setup is rejected.
    pub fn new(config: &ClientConfig, sleeper: Arc<dyn Sleeper>) -> ApiResult<Self> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(config.server.disable_tls_checking);

        builder = match &config.server.proxy {
            Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy)?),
            None => builder.no_proxy(),
        };

        if config.server.disable_tls_checking {
            tracing::warn!(host = %config.server.host, "TLS certificate verification disabled");
        }

        Ok(Self {
            client: builder.build()?,
            credentials: config.credentials.clone(),
            force_async: config.requests.force_async,
            max_malformed_polls: config.requests.max_malformed_polls,
            sleeper,
        })
    }

    /// Execute one request, following the async job protocol if requested.
    ///
    /// Any final status outside 200-299 is returned as `ApiError::Status`
    /// with the populated envelope.
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let async_mode = request.is_async() || self.force_async;
        let base_url = request.base_url();

        let initial = self
            .send(
                request.method().clone(),
                request.url().clone(),
                request.body(),
                request.headers(),
                async_mode,
            )
            .await?;

        if async_mode && initial.status() == StatusCode::ACCEPTED {
            let hint = AsyncHint::from_headers(initial.headers())?;
            drop(initial);

            tracing::debug!(
                target_url = %request.url(),
                location = %hint.location,
                retry_after_secs = hint.retry_after.as_secs(),
                "Starting async polling"
            );

            let poller = AsyncPoller::new(self, self.sleeper.as_ref(), self.max_malformed_polls);
            let job = poller.wait_for_completion(&base_url, &hint).await?;

            let result_href = job
                .result_href()
                .ok_or_else(|| ApiError::Protocol(format!("async job {} is done but has no result href", job.href)))?;
            let result_url = join_href(&base_url, result_href)?;

            tracing::debug!(result_url = %result_url, "Downloading async results");
            let final_response = self.send_json_get(result_url).await?;
            return ApiResponse::read(final_response, Method::GET, request.body())
                .await?
                .into_result();
        }

        ApiResponse::read(initial, request.method().clone(), request.body())
            .await?
            .into_result()
    }

    /// Plain authenticated GET used for job polling and result download.
    pub(crate) async fn send_json_get(&self, url: Url) -> ApiResult<reqwest::Response> {
        let headers = [("Content-Type".to_string(), "application/json".to_string())];
        self.send(Method::GET, url, None, &headers, false).await
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&[u8]>,
        headers: &[(String, String)],
        async_mode: bool,
    ) -> ApiResult<reqwest::Response> {
        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .basic_auth(&self.credentials.user, Some(&self.credentials.key));

        let mut overrides = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
            overrides.insert(name, value);
        }
        if async_mode {
            overrides.insert(PREFER, HeaderValue::from_static(RESPOND_ASYNC));
        }
        builder = builder.headers(overrides);

        if let Some(body) = body {
            builder = builder.body(body.to_vec());
        }

        tracing::debug!(method = %method, url = %url, async_mode, "Sending request");
        let response = builder.send().await?;
        tracing::debug!(
            method = %method,
            url = %url,
            status = response.status().as_u16(),
            "Received response"
        );
        metrics::record_request(method.as_str(), response.status().as_u16());

        Ok(response)
    }
}
