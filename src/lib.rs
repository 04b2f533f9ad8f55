//! Policy server REST API client library.

pub mod api;
pub mod config;
pub mod http;
pub mod label_groups;
pub mod observability;
pub mod resilience;

pub use api::{ApiError, ApiResult, Href, PolicyClient, PolicyStatus};
pub use config::ClientConfig;
pub use http::{ApiRequest, ApiResponse};
pub use label_groups::{LabelGroup, LabelGroupTable};
