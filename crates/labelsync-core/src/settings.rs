//! Typed credentials/settings document

use crate::buckets::BucketNaming;
use crate::{ProvisionError, Result};
use labelsync_storage::Config as StorageConfig;
use labelsync_studio::StudioConfig;
use serde::Deserialize;
use std::time::Duration;

/// Default bucket name template
pub const DEFAULT_BUCKET_TEMPLATE: &str = "ls-{project}-{title}";

/// Settings loaded from the credentials document
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Annotation platform connection
    pub label_studio: StudioSettings,
    /// Object storage connection and bucket naming
    pub object_storage: ObjectStorageSettings,
}

/// Annotation platform connection settings
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioSettings {
    pub url: String,
    pub access_token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Object storage connection settings
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectStorageSettings {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// `{project}` and `{title}` are substituted
    #[serde(default = "default_bucket_template")]
    pub bucket_name_template: String,
    #[serde(default = "default_true")]
    pub lowercase_bucket_names: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

fn default_bucket_template() -> String {
    DEFAULT_BUCKET_TEMPLATE.to_string()
}

fn default_true() -> bool {
    true
}

impl Settings {
    /// Reject empty required values
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("label_studio.url", &self.label_studio.url),
            ("label_studio.access_token", &self.label_studio.access_token),
            ("object_storage.endpoint", &self.object_storage.endpoint),
            ("object_storage.region", &self.object_storage.region),
            ("object_storage.access_key_id", &self.object_storage.access_key_id),
            (
                "object_storage.secret_access_key",
                &self.object_storage.secret_access_key,
            ),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ProvisionError::MissingField(name.to_string()));
            }
        }

        if !self.object_storage.bucket_name_template.contains("{title}") {
            return Err(ProvisionError::ConfigParse(
                "object_storage.bucket_name_template must contain `{title}`".to_string(),
            ));
        }
        Ok(())
    }

    /// Client configuration for the annotation platform
    pub fn studio_config(&self) -> StudioConfig {
        StudioConfig::new(&self.label_studio.url, &self.label_studio.access_token)
            .with_timeout(Duration::from_secs(self.label_studio.timeout_secs))
            .with_page_size(self.label_studio.page_size)
    }

    /// Client configuration for the object storage
    pub fn storage_config(&self) -> StorageConfig {
        let s = &self.object_storage;
        StorageConfig::new(&s.endpoint)
            .with_region(&s.region)
            .with_credentials(&s.access_key_id, &s.secret_access_key)
            .with_timeout(Duration::from_secs(s.timeout_secs))
    }
}

impl ObjectStorageSettings {
    /// Bucket naming rule
    pub fn naming(&self) -> BucketNaming {
        BucketNaming {
            template: self.bucket_name_template.clone(),
            lowercase: self.lowercase_bucket_names,
        }
    }
}
