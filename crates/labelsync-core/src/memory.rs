//! In-memory remotes for testing
//!
//! Both remotes record every call so tests can assert on exactly what a
//! reconciliation would have sent.

use crate::remote::{BucketRemote, ProjectRemote, StorageLinkRemote};
use crate::{RemoteError, Result};
use async_trait::async_trait;
use labelsync_storage::{CorsConfiguration, CreateBucketOptions, VersioningStatus};
use labelsync_studio::{Attributes, Direction, Project, ProjectId, StorageLink};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeSet;

/// A call received by [`MemoryStudio`]
#[derive(Clone, Debug, PartialEq)]
pub enum StudioCall {
    ListProjects,
    CreateProject(Attributes),
    UpdateProject(ProjectId, Attributes),
    SetModelVersion(ProjectId, String),
    ListLinks(Direction, ProjectId),
    CreateLink(Direction, Attributes),
    UpdateLink(Direction, u64, Attributes),
    SyncLink(Direction, u64),
}

#[derive(Default)]
struct StudioState {
    projects: Vec<Project>,
    links: Vec<(Direction, StorageLink)>,
    calls: Vec<StudioCall>,
    next_id: u64,
    fail_on_create: bool,
}

/// In-memory annotation platform
#[derive(Default)]
pub struct MemoryStudio {
    state: Mutex<StudioState>,
}

impl MemoryStudio {
    /// Create an empty platform; ids start at 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing project
    pub fn with_project(self, id: ProjectId, title: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.projects.push(Project {
                id,
                title: Some(title.to_string()),
            });
            state.next_id = state.next_id.max(id);
        }
        self
    }

    /// Seed an existing storage link
    pub fn with_link(self, direction: Direction, id: u64, project: ProjectId, title: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.links.push((
                direction,
                StorageLink {
                    id,
                    project: Some(project),
                    title: Some(title.to_string()),
                    bucket: None,
                },
            ));
            state.next_id = state.next_id.max(id);
        }
        self
    }

    /// Make every create call fail
    pub fn failing_creates(self) -> Self {
        self.state.lock().fail_on_create = true;
        self
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<StudioCall> {
        self.state.lock().calls.clone()
    }

    /// Current projects
    pub fn projects(&self) -> Vec<Project> {
        self.state.lock().projects.clone()
    }

    /// Current links of one direction
    pub fn links(&self, direction: Direction) -> Vec<StorageLink> {
        self.state
            .lock()
            .links
            .iter()
            .filter(|(d, _)| *d == direction)
            .map(|(_, link)| link.clone())
            .collect()
    }

    /// Number of recorded calls matching a predicate
    pub fn count(&self, predicate: impl Fn(&StudioCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }
}

impl StudioState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_create(&self, what: &str) -> Result<()> {
        if self.fail_on_create {
            return Err(RemoteError::Rejected {
                service: "memory studio",
                message: format!("create {} refused", what),
            }
            .into());
        }
        Ok(())
    }
}

fn string_attr(attributes: &Attributes, key: &str) -> Option<String> {
    attributes.get(key).and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl ProjectRemote for MemoryStudio {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut state = self.state.lock();
        state.calls.push(StudioCall::ListProjects);
        Ok(state.projects.clone())
    }

    async fn create_project(&self, attributes: &Attributes) -> Result<Project> {
        let mut state = self.state.lock();
        state.calls.push(StudioCall::CreateProject(attributes.clone()));
        state.check_create("project")?;
        let project = Project {
            id: state.allocate_id(),
            title: string_attr(attributes, "title"),
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: ProjectId, attributes: &Attributes) -> Result<Project> {
        let mut state = self.state.lock();
        state
            .calls
            .push(StudioCall::UpdateProject(id, attributes.clone()));
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RemoteError::Rejected {
                service: "memory studio",
                message: format!("project {} not found", id),
            })?;
        if let Some(title) = string_attr(attributes, "title") {
            project.title = Some(title);
        }
        Ok(project.clone())
    }

    async fn set_model_version(&self, id: ProjectId, model_version: &str) -> Result<()> {
        self.state
            .lock()
            .calls
            .push(StudioCall::SetModelVersion(id, model_version.to_string()));
        Ok(())
    }
}

#[async_trait]
impl StorageLinkRemote for MemoryStudio {
    async fn list_links(
        &self,
        direction: Direction,
        project: ProjectId,
    ) -> Result<Vec<StorageLink>> {
        let mut state = self.state.lock();
        state.calls.push(StudioCall::ListLinks(direction, project));
        Ok(state
            .links
            .iter()
            .filter(|(d, link)| *d == direction && link.project == Some(project))
            .map(|(_, link)| link.clone())
            .collect())
    }

    async fn create_link(&self, direction: Direction, params: &Attributes) -> Result<StorageLink> {
        let mut state = self.state.lock();
        state
            .calls
            .push(StudioCall::CreateLink(direction, params.clone()));
        state.check_create("storage")?;
        let link = StorageLink {
            id: state.allocate_id(),
            project: params.get("project").and_then(Value::as_u64),
            title: string_attr(params, "title"),
            bucket: string_attr(params, "bucket"),
        };
        state.links.push((direction, link.clone()));
        Ok(link)
    }

    async fn update_link(
        &self,
        direction: Direction,
        id: u64,
        params: &Attributes,
    ) -> Result<StorageLink> {
        let mut state = self.state.lock();
        state
            .calls
            .push(StudioCall::UpdateLink(direction, id, params.clone()));
        let (_, link) = state
            .links
            .iter_mut()
            .find(|(d, link)| *d == direction && link.id == id)
            .ok_or_else(|| RemoteError::Rejected {
                service: "memory studio",
                message: format!("{} storage {} not found", direction, id),
            })?;
        if let Some(bucket) = string_attr(params, "bucket") {
            link.bucket = Some(bucket);
        }
        Ok(link.clone())
    }

    async fn sync_link(&self, direction: Direction, id: u64) -> Result<()> {
        self.state.lock().calls.push(StudioCall::SyncLink(direction, id));
        Ok(())
    }
}

/// A call received by [`MemoryObjectStore`]
#[derive(Clone, Debug, PartialEq)]
pub enum BucketCall {
    ListBuckets,
    CreateBucket(String, CreateBucketOptions),
    PutVersioning(String, VersioningStatus),
    PutCors(String, CorsConfiguration),
}

#[derive(Default)]
struct StoreState {
    buckets: BTreeSet<String>,
    calls: Vec<BucketCall>,
    fail_on_create: Option<String>,
}

/// In-memory object storage
#[derive(Default)]
pub struct MemoryObjectStore {
    state: Mutex<StoreState>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing bucket
    pub fn with_bucket(self, name: &str) -> Self {
        self.state.lock().buckets.insert(name.to_string());
        self
    }

    /// Make creation of one bucket fail
    pub fn failing_create(self, name: &str) -> Self {
        self.state.lock().fail_on_create = Some(name.to_string());
        self
    }

    pub fn buckets(&self) -> Vec<String> {
        self.state.lock().buckets.iter().cloned().collect()
    }

    pub fn calls(&self) -> Vec<BucketCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl BucketRemote for MemoryObjectStore {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let mut state = self.state.lock();
        state.calls.push(BucketCall::ListBuckets);
        Ok(state.buckets.iter().cloned().collect())
    }

    async fn create_bucket(&self, name: &str, options: &CreateBucketOptions) -> Result<()> {
        let mut state = self.state.lock();
        state
            .calls
            .push(BucketCall::CreateBucket(name.to_string(), options.clone()));
        if state.fail_on_create.as_deref() == Some(name) || state.buckets.contains(name) {
            return Err(RemoteError::Rejected {
                service: "memory object store",
                message: format!("cannot create bucket {}", name),
            }
            .into());
        }
        state.buckets.insert(name.to_string());
        Ok(())
    }

    async fn put_bucket_versioning(&self, name: &str, status: VersioningStatus) -> Result<()> {
        self.state
            .lock()
            .calls
            .push(BucketCall::PutVersioning(name.to_string(), status));
        Ok(())
    }

    async fn put_bucket_cors(&self, name: &str, cors: &CorsConfiguration) -> Result<()> {
        self.state
            .lock()
            .calls
            .push(BucketCall::PutCors(name.to_string(), cors.clone()));
        Ok(())
    }
}
