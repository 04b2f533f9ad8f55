//! Async job polling.
//!
//! # Responsibilities
//! - Read `Location` and `Retry-After` from a deferred-processing response
//! - Sleep the advertised interval, then GET the job status
//! - Repeat until the job reports `done`
//!
//! # Design Decisions
//! - A missing or non-numeric `Retry-After` is a protocol error; no default
//!   wait is assumed
//! - Well-formed, still-running statuses are polled without an upper bound
//! - Undecodable or empty status payloads count as "not done yet", but only
//!   `max_malformed` of them in a row are tolerated
//! - A rate-limited poll aborts polling; the orchestrator restarts the call
//! - A `failed` job is terminal and surfaces as an error

use std::time::Duration;

use reqwest::header::{HeaderMap, LOCATION, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::api::types::{ApiError, ApiResult, HrefRef};
use crate::http::request::join_href;
use crate::http::response::ApiResponse;
use crate::http::transport::Transport;
use crate::observability::metrics;
use crate::resilience::backoff::{parse_retry_after, Sleeper};

/// Job status value that signals completion.
pub const STATUS_DONE: &str = "done";
/// Job status value that signals the server gave up.
pub const STATUS_FAILED: &str = "failed";

/// Server-side record of a deferred operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncJobStatus {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub result: Option<HrefRef>,
    pub status: String,
    #[serde(default)]
    pub requested_at: Option<String>,
    #[serde(default)]
    pub terminated_at: Option<String>,
    #[serde(default)]
    pub requested_by: Option<HrefRef>,
}

impl AsyncJobStatus {
    pub fn is_done(&self) -> bool {
        self.status == STATUS_DONE
    }

    pub fn is_failed(&self) -> bool {
        self.status == STATUS_FAILED
    }

    /// Href of the result payload, once the job is done.
    pub fn result_href(&self) -> Option<&str> {
        self.result
            .as_ref()
            .map(|r| r.href.as_str())
            .filter(|href| !href.is_empty())
    }
}

/// Where and how often to poll, as advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsyncHint {
    /// Job status locator, relative to the API base URL.
    pub location: String,
    /// Wait before each status check.
    pub retry_after: Duration,
}

impl AsyncHint {
    /// Parse the hint from the deferred-processing response headers.
    pub fn from_headers(headers: &HeaderMap) -> ApiResult<Self> {
        let location = headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Protocol("async response has no Location header".to_string()))?;

        let raw = headers
            .get(RETRY_AFTER)
            .ok_or_else(|| ApiError::Protocol("async response has no Retry-After header".to_string()))?;
        let retry_after = raw
            .to_str()
            .ok()
            .and_then(parse_retry_after)
            .ok_or_else(|| ApiError::Protocol(format!("async response has invalid Retry-After {raw:?}")))?;

        Ok(Self {
            location: location.to_string(),
            retry_after,
        })
    }
}

/// Polls a job status resource through a transport.
pub struct AsyncPoller<'a> {
    transport: &'a Transport,
    sleeper: &'a dyn Sleeper,
    max_malformed: u32,
}

impl<'a> AsyncPoller<'a> {
    pub fn new(transport: &'a Transport, sleeper: &'a dyn Sleeper, max_malformed: u32) -> Self {
        Self {
            transport,
            sleeper,
            max_malformed,
        }
    }

    /// One poll: wait `retry_after`, GET the job, decode it.
    ///
    /// Returns `Ok(None)` when the status payload cannot be decoded, carries
    /// an empty status, or the poll was not answered with 2xx. A 429 is
    /// returned as `ApiError::Status` so the whole call is retried.
    pub async fn poll(&self, base_url: &str, hint: &AsyncHint) -> ApiResult<Option<AsyncJobStatus>> {
        let url = join_href(base_url, &hint.location)?;

        self.sleeper.sleep(hint.retry_after).await;

        let response = self.transport.send_json_get(url.clone()).await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(url = %url, "Job status poll was rate limited");
            metrics::record_async_poll("rate_limited");
            let response = ApiResponse::read(response, Method::GET, None).await?;
            return Err(ApiError::Status {
                response: Box::new(response),
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Job status poll was not successful");
            metrics::record_async_poll("http_error");
            return Ok(None);
        }

        match serde_json::from_str::<AsyncJobStatus>(&body) {
            Ok(job) if job.status.is_empty() => {
                tracing::warn!(url = %url, "Job status payload has an empty status");
                metrics::record_async_poll("malformed");
                Ok(None)
            }
            Ok(job) => {
                metrics::record_async_poll("decoded");
                Ok(Some(job))
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Could not decode job status");
                metrics::record_async_poll("malformed");
                Ok(None)
            }
        }
    }

    /// Poll until the job is done.
    ///
    /// # Errors
    /// - `ApiError::AsyncJobFailed` if the job reports `failed`
    /// - `ApiError::Protocol` after `max_malformed` undecodable polls in a row
    /// - `ApiError::Status` if a poll is answered with 429
    /// - any transport error from a poll
    pub async fn wait_for_completion(&self, base_url: &str, hint: &AsyncHint) -> ApiResult<AsyncJobStatus> {
        let mut attempt: u64 = 0;
        let mut malformed_in_a_row: u32 = 0;

        loop {
            attempt += 1;
            tracing::debug!(location = %hint.location, attempt, "Checking async results");

            match self.poll(base_url, hint).await? {
                Some(job) if job.is_done() => {
                    tracing::debug!(job = %job.href, attempts = attempt, "Async polling done");
                    return Ok(job);
                }
                Some(job) if job.is_failed() => {
                    return Err(ApiError::AsyncJobFailed {
                        href: job.href,
                        description: job.description.unwrap_or_default(),
                    });
                }
                Some(job) => {
                    malformed_in_a_row = 0;
                    tracing::debug!(job = %job.href, status = %job.status, "Async job not done yet");
                }
                None => {
                    malformed_in_a_row += 1;
                    if malformed_in_a_row >= self.max_malformed {
                        return Err(ApiError::Protocol(format!(
                            "{} consecutive unreadable job statuses from {}",
                            malformed_in_a_row, hint.location
                        )));
                    }
                }
            }
        }
    }
}
