//! Export pipeline: validate, serialize, and route named datasets
//!
//! Each entry of a collector's aggregate output is checked for meaningful
//! data, pretty-printed, and then either written to a local file
//! (non-production) or fanned out through the upload target collection
//! (production). Entries are processed concurrently and isolated from each
//! other: one entry's failure is logged, never propagated to siblings.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use harvest_core::{Environment, HarvestConfig, Result};
use serde_json::Value;

use super::collection::UploadTargetCollection;
use super::data::has_meaningful_data;
use super::descriptor::UploadDescriptor;
use super::naming::{export_filename, TimestampFormat};

/// Default directory for non-production exports
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Top-level export orchestration for one service
pub struct ExportPipeline {
    service_name: String,
    environment: Environment,
    timestamp_format: TimestampFormat,
    local_output_dir: PathBuf,
}

impl ExportPipeline {
    pub fn new(service_name: impl Into<String>, environment: Environment) -> Self {
        Self {
            service_name: service_name.into(),
            environment,
            timestamp_format: TimestampFormat::default(),
            local_output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Pipeline preconfigured from a validated service configuration
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(config.service_name.clone(), config.environment)
    }

    /// Select the filename timestamp convention
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Directory non-production exports are written to
    pub fn with_local_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_output_dir = dir.into();
        self
    }

    /// Export every entry of the dataset.
    ///
    /// Empty entries (per the meaningful-data predicate) are skipped with a
    /// warning and never fail the batch. In production each remaining entry
    /// is uploaded through the target collection with its data-source name
    /// merged into `upload_options`; everywhere else it is written to
    /// `{local_output_dir}/{service}-{data_source}-{timestamp}.json`.
    pub async fn export_all(
        &self,
        targets: &UploadTargetCollection,
        dataset: HashMap<String, Value>,
        upload_options: &UploadDescriptor,
    ) -> Result<()> {
        let timestamp = Utc::now();
        let entries = dataset.into_iter().map(|(data_source, value)| {
            self.export_entry(targets, data_source, value, upload_options, &timestamp)
        });
        join_all(entries).await;
        Ok(())
    }

    async fn export_entry(
        &self,
        targets: &UploadTargetCollection,
        data_source: String,
        value: Value,
        upload_options: &UploadDescriptor,
        timestamp: &DateTime<Utc>,
    ) {
        if !has_meaningful_data(&value) {
            log::warn!("skipping export of '{data_source}': no meaningful data");
            return;
        }

        let payload = match serde_json::to_vec_pretty(&value) {
            Ok(payload) => payload,
            Err(error) => {
                log::error!("could not serialize '{data_source}': {error}");
                return;
            }
        };

        let filename = export_filename(
            &self.service_name,
            &data_source,
            timestamp,
            self.timestamp_format,
        );

        if self.environment.is_production() {
            let descriptor = upload_options
                .clone()
                .with_data_source(&data_source)
                .with_filename(&filename);
            if let Err(error) = targets.upload(&payload, &descriptor).await {
                log::error!("export of '{data_source}' failed: {error}");
            }
        } else if let Err(error) = self.write_local(&filename, &payload).await {
            log::error!("local export of '{data_source}' failed: {error}");
        }
    }

    async fn write_local(&self, filename: &str, payload: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.local_output_dir).await?;
        let path = self.local_output_dir.join(filename);
        tokio::fs::write(&path, payload).await?;
        log::info!("wrote export to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::UploadTarget;
    use async_trait::async_trait;
    use harvest_core::ServiceLocation;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CapturingTarget {
        calls: Mutex<Vec<(Vec<u8>, UploadDescriptor)>>,
    }

    impl CapturingTarget {
        fn calls(&self) -> Vec<(Vec<u8>, UploadDescriptor)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UploadTarget for CapturingTarget {
        fn name(&self) -> &str {
            "capturing"
        }

        async fn upload_file(
            &self,
            payload: &[u8],
            descriptor: &UploadDescriptor,
        ) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((payload.to_vec(), descriptor.clone()));
            Ok(())
        }
    }

    fn dataset() -> HashMap<String, Value> {
        HashMap::from([
            ("nodes".to_string(), serde_json::json!({"cpu": 0.5})),
            ("storage".to_string(), serde_json::json!({})),
        ])
    }

    #[tokio::test]
    async fn production_uploads_only_meaningful_entries() {
        let target = Arc::new(CapturingTarget::default());
        let targets = UploadTargetCollection::new(vec![target.clone()]);
        let pipeline = ExportPipeline::new("appliance", Environment::Production);
        let options = UploadDescriptor::for_service("appliance", ServiceLocation::Global);

        pipeline
            .export_all(&targets, dataset(), &options)
            .await
            .unwrap();

        let calls = target.calls();
        // storage is empty and skipped; only nodes goes out
        assert_eq!(calls.len(), 1);

        let (payload, descriptor) = &calls[0];
        let uploaded: Value = serde_json::from_slice(payload).unwrap();
        assert_eq!(uploaded, serde_json::json!({"cpu": 0.5}));
        assert_eq!(descriptor.data_source_name(), Some("nodes"));

        let key = descriptor.object_key();
        assert!(key.starts_with("global/appliance/nodes/appliance-nodes-"));
        assert!(key.ends_with(".json"));
    }

    #[tokio::test]
    async fn non_production_writes_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let targets = UploadTargetCollection::default();
        let config = HarvestConfig::from_lookup(|name| match name {
            "SERVICE_NAME" => Some("appliance".to_string()),
            "API_HOST" => Some("api.example.test".to_string()),
            _ => None,
        })
        .unwrap();
        let pipeline = ExportPipeline::from_config(&config).with_local_output_dir(dir.path());
        let options = UploadDescriptor::for_service("appliance", ServiceLocation::Global);

        pipeline
            .export_all(&targets, dataset(), &options)
            .await
            .unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        // storage is skipped; a single pretty-printed nodes export remains
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("appliance-nodes-"));

        let contents = std::fs::read_to_string(dir.path().join(&files[0])).unwrap();
        assert!(contents.contains('\n'));
        let value: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value, serde_json::json!({"cpu": 0.5}));
    }

    #[tokio::test]
    async fn timestamp_format_is_selectable() {
        let dir = tempfile::tempdir().unwrap();
        let targets = UploadTargetCollection::default();
        let pipeline = ExportPipeline::new("appliance", Environment::Development)
            .with_local_output_dir(dir.path())
            .with_timestamp_format(TimestampFormat::Plain);

        pipeline
            .export_all(
                &targets,
                HashMap::from([("nodes".to_string(), serde_json::json!({"cpu": 1}))]),
                &UploadDescriptor::for_service("appliance", ServiceLocation::Global),
            )
            .await
            .unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files.len(), 1);
        // Plain format: a single date block, no doubled day segment
        let name = files[0]
            .strip_prefix("appliance-nodes-")
            .unwrap()
            .strip_suffix(".json")
            .unwrap();
        assert_eq!(name.matches('_').count(), 1);
    }

    #[tokio::test]
    async fn an_invalid_descriptor_does_not_abort_sibling_entries() {
        let target = Arc::new(CapturingTarget::default());
        let targets = UploadTargetCollection::new(vec![target.clone()]);
        let pipeline = ExportPipeline::new("appliance", Environment::Production);
        // Site location with no site name: every upload is rejected at
        // validation, but export_all itself still settles cleanly.
        let options = UploadDescriptor::for_service("appliance", ServiceLocation::Site);

        pipeline
            .export_all(&targets, dataset(), &options)
            .await
            .unwrap();

        assert!(target.calls().is_empty());
    }
}
