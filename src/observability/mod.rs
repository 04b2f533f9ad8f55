//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request lifecycle produces:
//!     → logging.rs (structured log events, verbose request/response pairs)
//!     → metrics.rs (counters for requests, rate-limit retries, async polls)
//!
//! Consumers:
//!     → stdout via tracing-subscriber (installed by the binary)
//!     → any `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Logging is diagnostic only; nothing branches on whether it is enabled
//! - Request ID flows through every event of one orchestrated call
//! - The library never installs a global subscriber or recorder itself

pub mod logging;
pub mod metrics;
