//! Binding buckets to projects as S3 import/export storages

use crate::buckets::BucketBinding;
use crate::remote::{StorageLinkRemote, Upsert};
use crate::settings::ObjectStorageSettings;
use crate::Result;
use labelsync_studio::{Attributes, Direction, Project};
use serde_json::Value;
use tracing::info;

/// Storage link parameters for one bucket.
///
/// Connection defaults come first, the declaration's `ls_storage_params`
/// override them, and the identity fields (`bucket`, `project`, `title`) are
/// always set last.
pub fn connection_params(
    storage: &ObjectStorageSettings,
    project: &Project,
    binding: &BucketBinding,
) -> Attributes {
    let mut params = Attributes::new();
    params.insert("s3_endpoint".into(), Value::from(storage.endpoint.clone()));
    params.insert("region_name".into(), Value::from(storage.region.clone()));
    params.insert(
        "aws_access_key_id".into(),
        Value::from(storage.access_key_id.clone()),
    );
    params.insert(
        "aws_secret_access_key".into(),
        Value::from(storage.secret_access_key.clone()),
    );

    for (key, value) in &binding.declaration.ls_storage_params {
        params.insert(key.clone(), value.clone());
    }

    params.insert("bucket".into(), Value::from(binding.bucket.clone()));
    params.insert("project".into(), Value::from(project.id));
    params.insert("title".into(), Value::from(binding.title.clone()));
    params
}

/// Create or update one storage link per bucket, then trigger its sync.
/// Bindings are processed in the order given.
///
/// Every direction is parsed before the first remote call, so an invalid
/// declaration leaves the platform untouched.
pub async fn bind(
    remote: &dyn StorageLinkRemote,
    storage: &ObjectStorageSettings,
    project: &Project,
    bindings: &[BucketBinding],
) -> Result<()> {
    let mut planned: Vec<(Direction, &BucketBinding)> = Vec::with_capacity(bindings.len());
    for binding in bindings {
        planned.push((binding.direction()?, binding));
    }

    for (direction, binding) in planned {
        let params = connection_params(storage, project, binding);
        let title = binding.title.as_str();

        let link = match remote
            .create_or_update_link(direction, project.id, title, &params)
            .await?
        {
            Upsert::Created(link) => {
                info!("Created {} storage `{}`", direction, title);
                link
            }
            Upsert::Updated(link) => {
                info!("Updated {} storage `{}`", direction, title);
                link
            }
        };

        info!("Syncing {} storage `{}`", direction, title);
        remote.sync_link(direction, link.id).await?;
    }

    Ok(())
}
