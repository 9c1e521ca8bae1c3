//! End-to-end provisioning of every manifest

use crate::binder::bind;
use crate::buckets::ensure_buckets;
use crate::loader::{discover_overrides, load_manifest};
use crate::project::reconcile;
use crate::remote::{BucketRemote, ProjectRemote, StorageLinkRemote};
use crate::settings::ObjectStorageSettings;
use crate::{Manifest, Result};
use labelsync_studio::ProjectId;
use std::path::Path;
use tracing::{info, info_span, Instrument};

/// What one manifest produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvisionReport {
    pub title: String,
    pub project_id: ProjectId,
    pub created: bool,
    pub buckets: Vec<String>,
}

/// Remotes and settings needed to provision manifests
pub struct Provisioner<'a> {
    pub projects: &'a dyn ProjectRemote,
    pub links: &'a dyn StorageLinkRemote,
    pub buckets: &'a dyn BucketRemote,
    pub storage: &'a ObjectStorageSettings,
}

impl<'a> Provisioner<'a> {
    /// Reconcile the project, its buckets and its storage links
    pub async fn provision(&self, manifest: &Manifest) -> Result<ProvisionReport> {
        let outcome = reconcile(self.projects, manifest).await?;
        let created = outcome.is_created();
        let project = outcome.into_inner();

        let bindings = ensure_buckets(
            self.buckets,
            &self.storage.naming(),
            &project,
            &manifest.storages,
        )
        .await?;
        bind(self.links, self.storage, &project, &bindings).await?;

        Ok(ProvisionReport {
            title: manifest.title().unwrap_or_default().to_string(),
            project_id: project.id,
            created,
            buckets: bindings.into_iter().map(|b| b.bucket).collect(),
        })
    }

    /// Provision the template merged with every override in `manifests_dir`,
    /// one after another. The first failure stops the run.
    pub async fn run(&self, template: &Path, manifests_dir: &Path) -> Result<Vec<ProvisionReport>> {
        let overrides = discover_overrides(manifests_dir).await?;
        info!(
            count = overrides.len(),
            dir = %manifests_dir.display(),
            "Found manifests"
        );

        let mut reports = Vec::with_capacity(overrides.len());
        for path in overrides {
            let span = info_span!("manifest", file = %path.display());
            let report = async {
                let manifest = load_manifest(template, &path).await?;
                self.provision(&manifest).await
            }
            .instrument(span)
            .await?;
            reports.push(report);
        }
        Ok(reports)
    }
}
