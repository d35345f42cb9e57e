//! Collector contract implemented by every service-specific client
//!
//! A collector wraps an [`AuthenticatedHttpClient`](crate::http::AuthenticatedHttpClient)
//! and aggregates everything its service is responsible for into a named
//! dataset. Construction is an inherent `async fn connect(...) -> Result<Self>`
//! on each implementation - connection arguments differ per service, so the
//! trait only covers the running lifecycle.
//!
//! # Example Implementation
//!
//! ```rust,ignore
//! use harvest_core::{AuthenticatedHttpClient, AuthMaterial, Collector, Method, RequestOverrides};
//!
//! struct ApplianceCollector {
//!     client: AuthenticatedHttpClient,
//! }
//!
//! impl ApplianceCollector {
//!     async fn connect(base_url: &str, token: &str) -> harvest_core::Result<Self> {
//!         Ok(Self {
//!             client: AuthenticatedHttpClient::new(base_url, AuthMaterial::bearer(token)),
//!         })
//!     }
//! }
//!
//! #[async_trait::async_trait]
//! impl Collector for ApplianceCollector {
//!     fn service_name(&self) -> &str {
//!         "appliance"
//!     }
//!
//!     async fn collect_all(&self) -> harvest_core::Result<HashMap<String, Value>> {
//!         let nodes = self
//!             .client
//!             .request(Method::Get, "v1/nodes", RequestOverrides::new())
//!             .await?
//!             .json()?;
//!         Ok(HashMap::from([("nodes".to_string(), nodes)]))
//!     }
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Per-service collector client contract
#[async_trait]
pub trait Collector: Send + Sync {
    /// Name of the service this collector gathers data for; used in
    /// diagnostics and export naming
    fn service_name(&self) -> &str;

    /// Aggregate every data source the collector is responsible for into a
    /// mapping of data-source name to raw value
    async fn collect_all(&self) -> Result<HashMap<String, Value>>;

    /// Release any persistent resource (session, socket) the collector
    /// holds; the default is a no-op
    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}
