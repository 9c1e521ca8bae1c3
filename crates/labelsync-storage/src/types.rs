//! Request and response types for the S3 bucket API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bucket
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    /// Bucket name
    pub name: String,
    /// Creation date, when the endpoint reports a parseable one
    pub creation_date: Option<DateTime<Utc>>,
}

/// Result of listing buckets
#[derive(Clone, Debug, Default)]
pub struct ListBucketsResult {
    /// List of buckets
    pub buckets: Vec<Bucket>,
}

impl ListBucketsResult {
    /// Bucket names in listing order
    pub fn names(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.name.clone()).collect()
    }
}

/// Options applied when a bucket is created
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateBucketOptions {
    /// Canned ACL sent as `x-amz-acl`
    pub acl: Option<String>,
    /// Location constraint sent in `CreateBucketConfiguration`
    pub location_constraint: Option<String>,
}

/// Bucket CORS configuration (`PutBucketCors` body)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CorsConfiguration {
    #[serde(rename = "CORSRule")]
    pub rules: Vec<CorsRule>,
}

/// A single CORS rule
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CorsRule {
    #[serde(rename = "AllowedHeader")]
    pub allowed_headers: Vec<String>,
    #[serde(rename = "AllowedMethod")]
    pub allowed_methods: Vec<String>,
    #[serde(rename = "AllowedOrigin")]
    pub allowed_origins: Vec<String>,
    #[serde(rename = "ExposeHeader")]
    pub expose_headers: Vec<String>,
    #[serde(rename = "MaxAgeSeconds", skip_serializing_if = "Option::is_none")]
    pub max_age_seconds: Option<u32>,
}

/// Versioning state for `PutBucketVersioning`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersioningStatus {
    Enabled,
    Suspended,
}

impl VersioningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Suspended => "Suspended",
        }
    }
}

#[derive(Serialize)]
pub(crate) struct VersioningConfiguration {
    #[serde(rename = "Status")]
    pub status: &'static str,
}

#[derive(Serialize)]
pub(crate) struct CreateBucketConfiguration {
    #[serde(rename = "LocationConstraint")]
    pub location_constraint: String,
}

#[derive(Deserialize)]
pub(crate) struct ListAllMyBucketsResult {
    #[serde(rename = "Buckets", default)]
    pub buckets: BucketList,
}

#[derive(Default, Deserialize)]
pub(crate) struct BucketList {
    #[serde(rename = "Bucket", default)]
    pub bucket: Vec<BucketEntry>,
}

#[derive(Deserialize)]
pub(crate) struct BucketEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CreationDate", default)]
    pub creation_date: Option<String>,
}

impl From<BucketEntry> for Bucket {
    fn from(entry: BucketEntry) -> Self {
        let creation_date = entry
            .creation_date
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));
        Self {
            name: entry.name,
            creation_date,
        }
    }
}
