//! Policy server API client.
//!
//! # Data Flow
//! ```text
//! caller
//!     → client.rs (request orchestrator: request id span, 429 retry)
//!     → http::Transport (single exchange, async polling)
//!     → ApiResponse or ApiError back to caller
//! ```
//!
//! # Design Decisions
//! - One client owns one reqwest connection pool and one lookup table
//! - Every operation returns the response envelope so callers can inspect
//!   the raw body on success and failure alike

pub mod client;
pub mod types;

pub use client::PolicyClient;
pub use types::{ApiError, ApiResult, Href, HrefRef, PolicyStatus};
