//! Adapter traits for the remote systems
//!
//! Each trait exposes the primitive calls a backend must provide plus
//! provided `find_*`/`create_or_update_*` methods, so title-based idempotency
//! is decided in one place.

use crate::Result;
use async_trait::async_trait;
use labelsync_storage::{CorsConfiguration, CreateBucketOptions, VersioningStatus};
use labelsync_studio::{Attributes, Direction, Project, ProjectId, StorageLink};
use tracing::warn;

/// Outcome of a create-or-update call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Upsert<T> {
    Created(T),
    Updated(T),
}

impl<T> Upsert<T> {
    pub fn get(&self) -> &T {
        match self {
            Self::Created(v) | Self::Updated(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Created(v) | Self::Updated(v) => v,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// A remote entity addressed by title
pub trait Titled {
    fn id(&self) -> u64;
    fn title(&self) -> Option<&str>;
}

impl Titled for Project {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Titled for StorageLink {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Exact, case-sensitive title lookup.
///
/// Remotes do not enforce unique titles; when several entities match, the
/// one with the lowest id wins and the ambiguity is logged.
pub fn find_by_title<T: Titled>(items: Vec<T>, title: &str) -> Option<T> {
    let matches: Vec<T> = items
        .into_iter()
        .filter(|item| item.title() == Some(title))
        .collect();

    if matches.len() > 1 {
        let ids: Vec<u64> = matches.iter().map(Titled::id).collect();
        warn!(title, ?ids, "several remote entities share this title, using the lowest id");
    }

    matches.into_iter().min_by_key(Titled::id)
}

/// Project operations of the annotation platform
#[async_trait]
pub trait ProjectRemote: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>>;

    async fn create_project(&self, attributes: &Attributes) -> Result<Project>;

    async fn update_project(&self, id: ProjectId, attributes: &Attributes) -> Result<Project>;

    /// Partial update of `model_version` only
    async fn set_model_version(&self, id: ProjectId, model_version: &str) -> Result<()>;

    async fn find_project(&self, title: &str) -> Result<Option<Project>> {
        Ok(find_by_title(self.list_projects().await?, title))
    }

    async fn create_or_update_project(
        &self,
        title: &str,
        attributes: &Attributes,
    ) -> Result<Upsert<Project>> {
        match self.find_project(title).await? {
            Some(existing) => Ok(Upsert::Updated(
                self.update_project(existing.id, attributes).await?,
            )),
            None => Ok(Upsert::Created(self.create_project(attributes).await?)),
        }
    }
}

/// S3 storage link operations of the annotation platform
#[async_trait]
pub trait StorageLinkRemote: Send + Sync {
    async fn list_links(&self, direction: Direction, project: ProjectId)
        -> Result<Vec<StorageLink>>;

    async fn create_link(&self, direction: Direction, params: &Attributes) -> Result<StorageLink>;

    async fn update_link(
        &self,
        direction: Direction,
        id: u64,
        params: &Attributes,
    ) -> Result<StorageLink>;

    /// Trigger a sync; completion is not awaited
    async fn sync_link(&self, direction: Direction, id: u64) -> Result<()>;

    async fn find_link(
        &self,
        direction: Direction,
        project: ProjectId,
        title: &str,
    ) -> Result<Option<StorageLink>> {
        Ok(find_by_title(self.list_links(direction, project).await?, title))
    }

    async fn create_or_update_link(
        &self,
        direction: Direction,
        project: ProjectId,
        title: &str,
        params: &Attributes,
    ) -> Result<Upsert<StorageLink>> {
        match self.find_link(direction, project, title).await? {
            Some(existing) => Ok(Upsert::Updated(
                self.update_link(direction, existing.id, params).await?,
            )),
            None => Ok(Upsert::Created(self.create_link(direction, params).await?)),
        }
    }
}

/// Bucket operations of the object storage
#[async_trait]
pub trait BucketRemote: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<String>>;

    async fn create_bucket(&self, name: &str, options: &CreateBucketOptions) -> Result<()>;

    async fn put_bucket_versioning(&self, name: &str, status: VersioningStatus) -> Result<()>;

    /// Full overwrite of the bucket's CORS rules
    async fn put_bucket_cors(&self, name: &str, cors: &CorsConfiguration) -> Result<()>;
}
