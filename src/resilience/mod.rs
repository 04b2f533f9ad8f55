//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrated request:
//!     → transport executes (and drives async polling if requested)
//!     → 429? retries.rs sleeps the fixed backoff and re-runs the whole call
//!     → bound exceeded → RateLimitExhausted
//! ```
//!
//! # Design Decisions
//! - 429 is the only automatically recovered condition
//! - Backoff is fixed, not exponential
//! - Every pause goes through `Sleeper` so schedules can be asserted in tests

pub mod backoff;
pub mod retries;

pub use backoff::{Sleeper, TokioSleeper};
pub use retries::{retry_on_rate_limit, RateLimitPolicy};
