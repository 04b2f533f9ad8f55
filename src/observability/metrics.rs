//! Metrics collection.
//!
//! # Metrics
//! - `policy_client_requests_total` (counter): HTTP exchanges by method, status
//! - `policy_client_rate_limit_retries_total` (counter): 429 backoffs taken
//! - `policy_client_async_polls_total` (counter): job-status polls by outcome
//!
//! Recording goes through the `metrics` facade and is a no-op until the
//! embedding application installs a recorder.

use metrics::counter;

/// Record one completed HTTP exchange.
pub fn record_request(method: &str, status: u16) {
    counter!(
        "policy_client_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a rate-limit backoff.
pub fn record_rate_limit_retry() {
    counter!("policy_client_rate_limit_retries_total").increment(1);
}

/// Record one async job-status poll.
pub fn record_async_poll(outcome: &'static str) {
    counter!("policy_client_async_polls_total", "outcome" => outcome).increment(1);
}
