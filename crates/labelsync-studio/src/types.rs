//! API resource types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Free-form JSON object sent as a create/update body
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Project identifier assigned by the platform
pub type ProjectId = u64;

/// Direction of an S3 storage link
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Source storage: tasks are imported from the bucket
    Import,
    /// Target storage: annotations are exported to the bucket
    Export,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Export => "export",
        }
    }

    /// List/create path of the S3 storages for this direction.
    /// The platform routes the import list with a trailing slash, the export
    /// list without one.
    pub(crate) fn collection(&self) -> &'static str {
        match self {
            Self::Import => "/api/storages/s3/",
            Self::Export => "/api/storages/export/s3",
        }
    }

    /// Path of one S3 storage; neither direction takes a trailing slash
    pub(crate) fn item(&self, id: u64) -> String {
        match self {
            Self::Import => format!("/api/storages/s3/{}", id),
            Self::Export => format!("/api/storages/export/s3/{}", id),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction literal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown storage direction: {}", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for Direction {
    type Err = UnknownDirection;

    /// Exact, case-sensitive match on `import` / `export`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "import" => Ok(Self::Import),
            "export" => Ok(Self::Export),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

/// A project as returned by the projects API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub title: Option<String>,
}

/// An S3 import or export storage attached to a project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLink {
    pub id: u64,
    #[serde(default)]
    pub project: Option<ProjectId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
}

/// List endpoints answer either with a page envelope or a bare array,
/// depending on the platform version.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Page(Page<T>),
    Plain(Vec<T>),
}

#[derive(Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<T>,
}
