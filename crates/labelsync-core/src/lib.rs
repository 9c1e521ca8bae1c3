//! # labelsync core
//!
//! Reconciles declarative project manifests against an annotation platform
//! and an S3-compatible object storage.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐   ┌───────────────┐
//! │ Config loader│──▶│ Project reconcile│──▶│ Bucket provision │──▶│ Storage binder│
//! │ template +   │   │ upsert by title  │   │ create-if-absent │   │ upsert + sync │
//! │ override     │   │                  │   │ CORS every run   │   │               │
//! └──────────────┘   └──────────────────┘   └──────────────────┘   └───────────────┘
//! ```
//!
//! Remote systems are reached through [`ProjectRemote`], [`StorageLinkRemote`]
//! and [`BucketRemote`]; the HTTP clients implement them in [`adapters`],
//! [`memory`] provides in-process versions.
//!
//! Nothing is stored locally: every run re-reads the configuration and
//! re-queries both remotes.

pub mod adapters;
pub mod binder;
pub mod buckets;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod memory;
pub mod pipeline;
pub mod project;
pub mod remote;
pub mod settings;

pub use buckets::{cors_policy, ensure_buckets, BucketBinding, BucketNaming};
pub use binder::{bind, connection_params};
pub use error::{ProvisionError, RemoteError, Result};
pub use loader::{discover_overrides, load_manifest, load_settings, merge_manifest};
pub use manifest::{BucketOptions, Manifest, StorageDeclaration};
pub use pipeline::{ProvisionReport, Provisioner};
pub use project::reconcile;
pub use remote::{find_by_title, BucketRemote, ProjectRemote, StorageLinkRemote, Upsert};
pub use settings::{ObjectStorageSettings, Settings, StudioSettings};

pub use labelsync_studio::{Direction, Project, ProjectId};
