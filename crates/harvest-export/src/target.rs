//! Upload target contract and the filesystem reference implementation

use std::path::PathBuf;

use async_trait::async_trait;
use harvest_core::error::{Error, Result};

use super::descriptor::UploadDescriptor;

/// A single configured upload destination.
///
/// Implementations wrap one provider client (an object store bucket, an
/// SFTP drop, ...). The collection owns targets for their whole lifetime
/// and is responsible for disconnecting them.
#[async_trait]
pub trait UploadTarget: Send + Sync {
    /// Target name used in diagnostics
    fn name(&self) -> &str;

    /// Deliver a payload to the destination the descriptor describes.
    ///
    /// Fails with [`Error::Upload`] when the underlying transport or
    /// provider call fails. Callers validate the descriptor beforehand.
    async fn upload_file(&self, payload: &[u8], descriptor: &UploadDescriptor) -> Result<()>;

    /// Release underlying client resources. Must be idempotent: calling it
    /// on an already-disconnected target is safe. The default is a no-op.
    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

/// Filesystem-backed target.
///
/// Used by development deployments and as the reference implementation of
/// the upload contract; object keys become paths under the target's root.
pub struct LocalDirTarget {
    name: String,
    root: PathBuf,
}

impl LocalDirTarget {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl UploadTarget for LocalDirTarget {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_file(&self, payload: &[u8], descriptor: &UploadDescriptor) -> Result<()> {
        let destination = self.root.join(descriptor.object_key());
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| Error::Upload {
                    target: self.name.clone(),
                    message: format!("could not create {}", parent.display()),
                    source: Some(error.into()),
                })?;
        }
        tokio::fs::write(&destination, payload)
            .await
            .map_err(|error| Error::Upload {
                target: self.name.clone(),
                message: format!("could not write {}", destination.display()),
                source: Some(error.into()),
            })
    }
}
