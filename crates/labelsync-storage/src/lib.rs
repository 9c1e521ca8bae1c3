//! # labelsync object storage client
//!
//! A minimal client for the bucket-level S3 API, enough to provision buckets
//! for annotation projects on any S3-compatible endpoint (Yandex Object
//! Storage, MinIO, AWS).
//!
//! ## Features
//!
//! - **SigV4**: requests are signed with static access keys
//! - **Bucket API**: list, create, CORS and versioning configuration
//!
//! ## Example
//!
//! ```rust,ignore
//! use labelsync_storage::{Config, CreateBucketOptions, ObjectStorageClient};
//!
//! let client = ObjectStorageClient::new(
//!     Config::new("https://storage.yandexcloud.net")
//!         .with_region("ru-central1")
//!         .with_credentials("key-id", "secret"),
//! )?;
//!
//! let existing = client.list_buckets().await?.names();
//! if !existing.contains(&"ls-42-raw".to_string()) {
//!     client.create_bucket("ls-42-raw", &CreateBucketOptions::default()).await?;
//! }
//! ```

mod client;
mod config;
mod error;
pub mod signing;
mod types;

pub use client::ObjectStorageClient;
pub use config::Config;
pub use error::{Result, StorageError};
pub use types::{
    Bucket, CorsConfiguration, CorsRule, CreateBucketOptions, ListBucketsResult, VersioningStatus,
};
