//! Harvest Export - multi-destination export pipeline for collector services
//!
//! Takes the named dataset a collector produced and delivers it: entries
//! are checked for meaningful data, pretty-printed, and either written
//! locally (non-production) or fanned out concurrently to every configured
//! upload target (production). Failures are contained per entry and per
//! target; one outage never takes down a sibling export.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use harvest_core::{Environment, ServiceLocation};
//! use harvest_export::{ExportPipeline, LocalDirTarget, UploadDescriptor, UploadTargetCollection};
//!
//! async fn export(dataset: HashMap<String, serde_json::Value>) -> harvest_core::Result<()> {
//!     let targets = UploadTargetCollection::new(vec![
//!         Arc::new(LocalDirTarget::new("archive", "/var/harvest")),
//!     ]);
//!     let pipeline = ExportPipeline::new("appliance", Environment::Production);
//!     let options = UploadDescriptor::for_service("appliance", ServiceLocation::Global);
//!     pipeline.export_all(&targets, dataset, &options).await?;
//!     targets.disconnect_all().await;
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod data;
pub mod descriptor;
pub mod naming;
pub mod pipeline;
pub mod target;

// Re-export commonly used types at the crate root for convenience

pub use collection::UploadTargetCollection;
pub use data::has_meaningful_data;
pub use descriptor::UploadDescriptor;
pub use naming::{export_filename, TimestampFormat};
pub use pipeline::{ExportPipeline, DEFAULT_OUTPUT_DIR};
pub use target::{LocalDirTarget, UploadTarget};
