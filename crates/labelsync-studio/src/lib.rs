//! # labelsync annotation platform client
//!
//! Thin async client for the parts of the Label Studio REST API that
//! provisioning needs: projects and S3 import/export storages.
//!
//! ## Example
//!
//! ```rust,ignore
//! use labelsync_studio::{Direction, StudioClient, StudioConfig};
//!
//! let client = StudioClient::new(StudioConfig::new("https://label.example.com", token))?;
//! for project in client.list_projects().await? {
//!     let links = client.list_storages(Direction::Import, project.id).await?;
//!     println!("{:?}: {} import storages", project.title, links.len());
//! }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::StudioClient;
pub use config::StudioConfig;
pub use error::{Result, StudioError};
pub use types::{Attributes, Direction, Project, ProjectId, StorageLink, UnknownDirection};
