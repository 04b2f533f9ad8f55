//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, environment switches, host cleanup)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → owned by PolicyClient for its lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_switches, load_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::CredentialsConfig;
pub use schema::ObservabilityConfig;
pub use schema::RequestConfig;
pub use schema::ServerConfig;
