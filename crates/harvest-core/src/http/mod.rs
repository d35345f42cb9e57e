//! Authenticated HTTP client base for collector services
//!
//! This module provides:
//! - Request descriptors and URL assembly
//! - Credential material merged into every request
//! - Error classification and normalization
//! - A deterministic retry policy with exponential backoff
//! - A transport abstraction so the client core is testable offline

pub mod auth;
pub mod client;
pub mod error;
pub mod request;
pub mod retry;
pub mod transport;

pub use auth::{AuthMaterial, AuthResolver};
pub use client::{AuthenticatedHttpClient, DEFAULT_TIMEOUT};
pub use error::{ErrorClassification, HttpError};
pub use request::{join_url, Method, RequestOverrides};
pub use retry::{RetryDecision, RetryPolicy};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportRequest};
