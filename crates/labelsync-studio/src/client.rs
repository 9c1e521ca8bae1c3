//! Annotation platform REST client

use crate::types::{Attributes, Direction, Listing, Project, ProjectId, StorageLink};
use crate::{Result, StudioConfig, StudioError};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

/// Client for the projects and S3 storage endpoints
#[derive(Clone)]
pub struct StudioClient {
    client: Client,
    config: StudioConfig,
}

impl StudioClient {
    /// Create a new client
    pub fn new(config: StudioConfig) -> Result<Self> {
        if config.access_token.is_empty() {
            return Err(StudioError::Configuration(
                "access token is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.config.access_token)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", self.auth_header())
    }

    // ==================== Projects ====================

    /// List every project visible to the token, following pagination
    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = self.config.endpoint("/api/projects/");
        let mut projects = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self
                .authorized(self.client.get(&url))
                .query(&[("page", page), ("page_size", self.config.page_size)])
                .send()
                .await?;

            match read_json::<Listing<Project>>(response, "list projects").await? {
                Listing::Plain(all) => {
                    projects.extend(all);
                    break;
                }
                Listing::Page(p) => {
                    let last = p.next.is_none() || p.results.is_empty();
                    projects.extend(p.results);
                    if last {
                        break;
                    }
                }
            }
            page += 1;
        }

        debug!(count = projects.len(), "listed projects");
        Ok(projects)
    }

    /// Create a project from an attribute map
    #[instrument(skip(self, attributes))]
    pub async fn create_project(&self, attributes: &Attributes) -> Result<Project> {
        let url = self.config.endpoint("/api/projects/");
        let response = self
            .authorized(self.client.post(&url))
            .json(attributes)
            .send()
            .await?;
        read_json(response, "create project").await
    }

    /// Update a project with an attribute map
    #[instrument(skip(self, attributes))]
    pub async fn update_project(&self, id: ProjectId, attributes: &Attributes) -> Result<Project> {
        let url = self.config.endpoint(&format!("/api/projects/{}/", id));
        let response = self
            .authorized(self.client.patch(&url))
            .json(attributes)
            .send()
            .await?;
        read_json(response, "update project").await
    }

    /// Set the project's `model_version` with a partial update
    #[instrument(skip(self))]
    pub async fn set_model_version(&self, id: ProjectId, model_version: &str) -> Result<()> {
        let url = self.config.endpoint(&format!("/api/projects/{}/", id));
        let response = self
            .authorized(self.client.patch(&url))
            .json(&json!({ "model_version": model_version }))
            .send()
            .await?;
        check_status(response, "set model version").await?;
        Ok(())
    }

    // ==================== S3 storages ====================

    /// List S3 storages of one direction attached to a project
    #[instrument(skip(self))]
    pub async fn list_storages(
        &self,
        direction: Direction,
        project: ProjectId,
    ) -> Result<Vec<StorageLink>> {
        let url = self.config.endpoint(direction.collection());
        let response = self
            .authorized(self.client.get(&url))
            .query(&[("project", project)])
            .send()
            .await?;

        match read_json::<Listing<StorageLink>>(response, "list storages").await? {
            Listing::Plain(links) => Ok(links),
            Listing::Page(p) => Ok(p.results),
        }
    }

    /// Create an S3 storage
    #[instrument(skip(self, params))]
    pub async fn create_storage(
        &self,
        direction: Direction,
        params: &Attributes,
    ) -> Result<StorageLink> {
        let url = self.config.endpoint(direction.collection());
        let response = self
            .authorized(self.client.post(&url))
            .json(params)
            .send()
            .await?;
        read_json(response, "create storage").await
    }

    /// Update an S3 storage
    #[instrument(skip(self, params))]
    pub async fn update_storage(
        &self,
        direction: Direction,
        id: u64,
        params: &Attributes,
    ) -> Result<StorageLink> {
        let url = self.config.endpoint(&direction.item(id));
        let response = self
            .authorized(self.client.patch(&url))
            .json(params)
            .send()
            .await?;
        read_json(response, "update storage").await
    }

    /// Ask the platform to synchronize a storage; completion is not awaited
    #[instrument(skip(self))]
    pub async fn sync_storage(&self, direction: Direction, id: u64) -> Result<()> {
        let url = self
            .config
            .endpoint(&format!("{}/sync", direction.item(id)));
        let response = self.authorized(self.client.post(&url)).send().await?;
        check_status(response, "sync storage").await?;
        Ok(())
    }
}

async fn check_status(response: Response, operation: &'static str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StudioError::Api {
            operation,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response, operation: &'static str) -> Result<T> {
    check_status(response, operation)
        .await?
        .json()
        .await
        .map_err(|e| StudioError::Deserialization(format!("{}: {}", operation, e)))
}
