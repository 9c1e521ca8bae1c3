//! Remote traits backed by the HTTP clients

use crate::remote::{BucketRemote, ProjectRemote, StorageLinkRemote};
use crate::Result;
use async_trait::async_trait;
use labelsync_storage::{
    CorsConfiguration, CreateBucketOptions, ObjectStorageClient, VersioningStatus,
};
use labelsync_studio::{Attributes, Direction, Project, ProjectId, StorageLink, StudioClient};

#[async_trait]
impl ProjectRemote for StudioClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(StudioClient::list_projects(self).await?)
    }

    async fn create_project(&self, attributes: &Attributes) -> Result<Project> {
        Ok(StudioClient::create_project(self, attributes).await?)
    }

    async fn update_project(&self, id: ProjectId, attributes: &Attributes) -> Result<Project> {
        Ok(StudioClient::update_project(self, id, attributes).await?)
    }

    async fn set_model_version(&self, id: ProjectId, model_version: &str) -> Result<()> {
        Ok(StudioClient::set_model_version(self, id, model_version).await?)
    }
}

#[async_trait]
impl StorageLinkRemote for StudioClient {
    async fn list_links(
        &self,
        direction: Direction,
        project: ProjectId,
    ) -> Result<Vec<StorageLink>> {
        Ok(self.list_storages(direction, project).await?)
    }

    async fn create_link(&self, direction: Direction, params: &Attributes) -> Result<StorageLink> {
        Ok(self.create_storage(direction, params).await?)
    }

    async fn update_link(
        &self,
        direction: Direction,
        id: u64,
        params: &Attributes,
    ) -> Result<StorageLink> {
        Ok(self.update_storage(direction, id, params).await?)
    }

    async fn sync_link(&self, direction: Direction, id: u64) -> Result<()> {
        Ok(self.sync_storage(direction, id).await?)
    }
}

#[async_trait]
impl BucketRemote for ObjectStorageClient {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(ObjectStorageClient::list_buckets(self).await?.names())
    }

    async fn create_bucket(&self, name: &str, options: &CreateBucketOptions) -> Result<()> {
        Ok(ObjectStorageClient::create_bucket(self, name, options).await?)
    }

    async fn put_bucket_versioning(&self, name: &str, status: VersioningStatus) -> Result<()> {
        Ok(ObjectStorageClient::put_bucket_versioning(self, name, status).await?)
    }

    async fn put_bucket_cors(&self, name: &str, cors: &CorsConfiguration) -> Result<()> {
        Ok(ObjectStorageClient::put_bucket_cors(self, name, cors).await?)
    }
}
