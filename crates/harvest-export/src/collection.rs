//! Fan-out across every configured upload target

use std::sync::Arc;

use futures::future::join_all;
use harvest_core::Result;

use super::descriptor::UploadDescriptor;
use super::target::UploadTarget;

/// Owns the configured upload targets for their whole lifetime and fans
/// every payload out to all of them concurrently.
///
/// The managed set is not meant to be mutated while an upload is in
/// flight; adds and removes happen outside the dispatch window.
#[derive(Default)]
pub struct UploadTargetCollection {
    targets: Vec<Arc<dyn UploadTarget>>,
}

impl UploadTargetCollection {
    pub fn new(targets: Vec<Arc<dyn UploadTarget>>) -> Self {
        Self { targets }
    }

    pub fn add(&mut self, target: Arc<dyn UploadTarget>) {
        self.targets.push(target);
    }

    /// Remove a target by name, returning it if present
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn UploadTarget>> {
        let index = self.targets.iter().position(|target| target.name() == name)?;
        Some(self.targets.remove(index))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|target| target.name()).collect()
    }

    /// Upload one payload to every managed target concurrently.
    ///
    /// The descriptor is validated once, before any target is invoked.
    /// Each target's failure is caught and logged individually; one
    /// target's outage neither cancels nor fails the others, and the call
    /// resolves once every attempt has settled.
    pub async fn upload(&self, payload: &[u8], descriptor: &UploadDescriptor) -> Result<()> {
        descriptor.validate()?;

        let attempts = self.targets.iter().map(|target| {
            let target = Arc::clone(target);
            async move {
                match target.upload_file(payload, descriptor).await {
                    Ok(()) => log::debug!(
                        "uploaded {} to target '{}'",
                        descriptor.object_key(),
                        target.name()
                    ),
                    Err(error) => {
                        log::error!("upload to target '{}' failed: {error}", target.name())
                    }
                }
            }
        });
        join_all(attempts).await;
        Ok(())
    }

    /// Disconnect every managed target, continuing past individual failures
    pub async fn disconnect_all(&self) {
        for target in &self.targets {
            if let Err(error) = target.disconnect().await {
                log::warn!("disconnect of target '{}' failed: {error}", target.name());
            }
        }
    }
}
