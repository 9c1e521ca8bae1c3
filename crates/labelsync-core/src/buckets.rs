//! Bucket provisioning

use crate::manifest::{StorageDeclaration, PROJECT_PLACEHOLDER};
use crate::remote::BucketRemote;
use crate::Result;
use labelsync_storage::{CorsConfiguration, CorsRule, VersioningStatus};
use labelsync_studio::{Direction, Project, ProjectId};
use std::collections::HashSet;
use tracing::info;

/// Placeholder replaced with the rendered storage title in bucket names
pub const TITLE_PLACEHOLDER: &str = "{title}";

/// CORS preflight cache lifetime applied to every bucket
pub const CORS_MAX_AGE_SECONDS: u32 = 3000;

/// Rule deriving bucket names from project id and storage title
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketNaming {
    pub template: String,
    pub lowercase: bool,
}

impl Default for BucketNaming {
    fn default() -> Self {
        Self {
            template: crate::settings::DEFAULT_BUCKET_TEMPLATE.to_string(),
            lowercase: true,
        }
    }
}

impl BucketNaming {
    /// Deterministic bucket name for a rendered storage title
    pub fn bucket_name(&self, project: ProjectId, storage_title: &str) -> String {
        let name = self
            .template
            .replace(PROJECT_PLACEHOLDER, &project.to_string())
            .replace(TITLE_PLACEHOLDER, storage_title);
        if self.lowercase {
            name.to_lowercase()
        } else {
            name
        }
    }
}

/// The CORS policy put on every provisioned bucket
pub fn cors_policy() -> CorsConfiguration {
    CorsConfiguration {
        rules: vec![CorsRule {
            allowed_headers: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string()],
            allowed_origins: vec!["*".to_string()],
            expose_headers: vec![
                "x-amz-server-side-encryption".to_string(),
                "x-amz-request-id".to_string(),
                "x-amz-id-2".to_string(),
            ],
            max_age_seconds: Some(CORS_MAX_AGE_SECONDS),
        }],
    }
}

/// A provisioned bucket and the declaration it came from
#[derive(Clone, Debug, PartialEq)]
pub struct BucketBinding {
    pub bucket: String,
    /// Storage title with the project id substituted
    pub title: String,
    pub declaration: StorageDeclaration,
}

impl BucketBinding {
    pub fn direction(&self) -> Result<Direction> {
        self.declaration.direction()
    }
}

/// Make sure a bucket exists for every storage declaration.
///
/// Buckets are listed once; missing ones are created with the declared
/// creation parameters, existing ones are left as they are. The CORS policy
/// is put on every bucket regardless. Nothing is rolled back on failure.
///
/// Bindings come back in declaration order, one per bucket. When two
/// declarations resolve to the same bucket, the later one replaces the
/// earlier in place.
pub async fn ensure_buckets(
    remote: &dyn BucketRemote,
    naming: &BucketNaming,
    project: &Project,
    storages: &[StorageDeclaration],
) -> Result<Vec<BucketBinding>> {
    let mut bindings: Vec<BucketBinding> = Vec::with_capacity(storages.len());
    if storages.is_empty() {
        return Ok(bindings);
    }

    let mut existing: HashSet<String> = remote.list_buckets().await?.into_iter().collect();
    let cors = cors_policy();

    for storage in storages {
        let title = storage.render_title(project.id)?;
        let bucket = naming.bucket_name(project.id, &title);

        if existing.contains(&bucket) {
            info!("Bucket `{}` already exists", bucket);
        } else {
            info!("Creating bucket `{}`", bucket);
            remote
                .create_bucket(&bucket, &storage.bucket.create_options())
                .await?;
            if storage.bucket.versioning {
                remote
                    .put_bucket_versioning(&bucket, VersioningStatus::Enabled)
                    .await?;
            }
            existing.insert(bucket.clone());
        }

        info!("Configuring bucket `{}`", bucket);
        remote.put_bucket_cors(&bucket, &cors).await?;

        let binding = BucketBinding {
            bucket,
            title,
            declaration: storage.clone(),
        };
        match bindings.iter_mut().find(|b| b.bucket == binding.bucket) {
            Some(slot) => *slot = binding,
            None => bindings.push(binding),
        }
    }

    Ok(bindings)
}
