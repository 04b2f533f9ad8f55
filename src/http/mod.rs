//! HTTP request lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! ApiRequest (method, url, body, headers, async flag)
//!     → transport.rs (TLS/proxy client, basic auth, Prefer header)
//!     → 202 + async? async_poll.rs (sleep Retry-After, GET Location until done)
//!                    → GET result href
//!     → response.rs (ApiResponse envelope, 2xx classification)
//!     → back to the orchestrator
//! ```

pub mod async_poll;
pub mod request;
pub mod response;
pub mod transport;

pub use async_poll::{AsyncHint, AsyncJobStatus, AsyncPoller};
pub use request::ApiRequest;
pub use response::ApiResponse;
pub use transport::Transport;
