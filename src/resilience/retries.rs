//! Rate-limit retry logic.
//!
//! # Responsibilities
//! - Detect a 429 response from the executed call
//! - Pause the fixed backoff and re-run the entire call
//! - Give up with a distinguished error once the retry bound is spent
//!
//! # Design Decisions
//! - Everything other than 429 passes through untouched
//! - The call is a closure so async polling restarts from scratch on retry

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

use crate::api::types::{ApiError, ApiResult};
use crate::config::RequestConfig;
use crate::http::ApiResponse;
use crate::observability::metrics;
use crate::resilience::backoff::Sleeper;

/// Fixed-backoff policy for 429 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Pause before every retry.
    pub backoff: Duration,
}

impl RateLimitPolicy {
    pub fn from_config(config: &RequestConfig) -> Self {
        Self {
            max_retries: config.rate_limit_max_retries,
            backoff: Duration::from_secs(config.rate_limit_backoff_secs),
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::from_config(&RequestConfig::default())
    }
}

/// Run `call`, retrying while it reports 429 Too Many Requests.
pub async fn retry_on_rate_limit<F, Fut>(
    policy: RateLimitPolicy,
    sleeper: &dyn Sleeper,
    mut call: F,
) -> ApiResult<ApiResponse>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<ApiResponse>>,
{
    let mut retries = 0;
    loop {
        let result = call().await;
        let response = match result {
            Err(ApiError::Status { response })
                if response.status == StatusCode::TOO_MANY_REQUESTS =>
            {
                response
            }
            other => return other,
        };

        if retries >= policy.max_retries {
            tracing::warn!(retries, url = %response.url, "Rate limit retries exhausted");
            return Err(ApiError::RateLimitExhausted { retries, response });
        }

        retries += 1;
        tracing::warn!(
            attempt = retries,
            max_retries = policy.max_retries,
            backoff_secs = policy.backoff.as_secs(),
            url = %response.url,
            "Rate limited, backing off"
        );
        metrics::record_rate_limit_retry();
        sleeper.sleep(policy.backoff).await;
    }
}
