//! Harvest Core - shared foundation for collector services
//!
//! This crate provides the building blocks every Harvest collector is made
//! of:
//!
//! - **Authenticated HTTP client** with a deterministic retry loop and
//!   merged credential material
//! - **Retry policy** classifying failures into retry-or-fail decisions
//!   with exponential backoff
//! - **Collector contract** for service-specific clients that aggregate
//!   named datasets
//! - **Environment configuration** validated field by field, failing fast
//!   at startup
//!
//! # Example
//!
//! ```no_run
//! use harvest_core::{AuthMaterial, AuthenticatedHttpClient, Method, RequestOverrides, Result};
//!
//! async fn fetch_nodes() -> Result<serde_json::Value> {
//!     let client = AuthenticatedHttpClient::new(
//!         "https://appliance.example.test",
//!         AuthMaterial::bearer("token"),
//!     );
//!     let response = client
//!         .request(Method::Get, "v1/nodes", RequestOverrides::new())
//!         .await?;
//!     response.json()
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result`] with the structured [`Error`] type.
//! Retryable failures are contained inside the client; terminal non-success
//! responses surface as [`Error::InvalidResponse`], and exhausted
//! network-level failures propagate the last transport error unchanged.

pub mod collector;
pub mod config;
pub mod error;
pub mod http;

// Re-export commonly used types at the crate root for convenience

pub use collector::Collector;
pub use config::{ApiConfig, Environment, HarvestConfig, ServiceLocation};
pub use error::{Error, FieldIssue, Result, SchemaIssue};
pub use http::{
    AuthMaterial, AuthResolver, AuthenticatedHttpClient, ErrorClassification, HttpError,
    HttpResponse, HttpTransport, Method, ReqwestTransport, RequestOverrides, RetryDecision,
    RetryPolicy, TransportRequest, DEFAULT_TIMEOUT,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
