//! Merged project manifest

use crate::{ProvisionError, Result};
use labelsync_storage::CreateBucketOptions;
use labelsync_studio::{Attributes, Direction, ProjectId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced with the remote project id in storage titles
pub const PROJECT_PLACEHOLDER: &str = "{project}";

/// One project, as declared by a template merged with an override document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Project attributes sent verbatim to the platform; `title` is the key
    #[serde(default)]
    pub details: Attributes,
    /// Text file injected as the project's expert instruction
    #[serde(default)]
    pub instruction_path: Option<PathBuf>,
    /// Annotation model version, set with a separate partial update
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub storages: Vec<StorageDeclaration>,
}

/// A bucket plus the storage link that attaches it to the project
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageDeclaration {
    /// `import` or `export`
    #[serde(rename = "type", alias = "ty", default)]
    pub kind: Option<String>,
    /// Link title; may contain `{project}`
    #[serde(default)]
    pub title: Option<String>,
    /// Parameters applied only when the bucket is created
    #[serde(default)]
    pub bucket: BucketOptions,
    /// Platform-side storage parameters, layered over the connection defaults
    #[serde(default)]
    pub ls_storage_params: Attributes,
}

/// Bucket creation parameters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketOptions {
    #[serde(default)]
    pub acl: Option<String>,
    #[serde(default)]
    pub location_constraint: Option<String>,
    #[serde(default)]
    pub versioning: bool,
}

impl Manifest {
    /// The non-empty project title, if declared
    pub fn title(&self) -> Option<&str> {
        self.details
            .get("title")
            .and_then(|v| v.as_str())
            .filter(|t| !t.trim().is_empty())
    }

    /// Check everything that can be checked without talking to a remote
    pub fn validate(&self) -> Result<()> {
        if self.title().is_none() {
            return Err(ProvisionError::MissingField("details.title".to_string()));
        }
        for storage in &self.storages {
            storage.direction()?;
            storage.title_template()?;
        }
        Ok(())
    }
}

impl StorageDeclaration {
    /// Parse the declared direction
    pub fn direction(&self) -> Result<Direction> {
        let kind = self
            .kind
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProvisionError::MissingField("storages[].type".to_string()))?;
        kind.parse()
            .map_err(|_| ProvisionError::InvalidStorageType(kind.to_string()))
    }

    fn title_template(&self) -> Result<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProvisionError::MissingField("storages[].title".to_string()))
    }

    /// Storage title with `{project}` replaced by the project id
    pub fn render_title(&self, project: ProjectId) -> Result<String> {
        Ok(self
            .title_template()?
            .replace(PROJECT_PLACEHOLDER, &project.to_string()))
    }
}

impl BucketOptions {
    pub fn create_options(&self) -> CreateBucketOptions {
        CreateBucketOptions {
            acl: self.acl.clone(),
            location_constraint: self.location_constraint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declaration(kind: Option<&str>, title: &str) -> StorageDeclaration {
        StorageDeclaration {
            kind: kind.map(str::to_string),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_title_requires_non_empty_string() {
        let mut manifest = Manifest::default();
        assert_eq!(manifest.title(), None);

        manifest.details.insert("title".into(), json!(""));
        assert_eq!(manifest.title(), None);

        manifest.details.insert("title".into(), json!(7));
        assert_eq!(manifest.title(), None);

        manifest.details.insert("title".into(), json!("Demo"));
        assert_eq!(manifest.title(), Some("Demo"));
    }

    #[test]
    fn test_direction_errors() {
        assert_eq!(
            declaration(Some("export"), "t").direction().unwrap(),
            Direction::Export
        );
        assert!(matches!(
            declaration(None, "t").direction(),
            Err(ProvisionError::MissingField(_))
        ));
        match declaration(Some("mirror"), "t").direction() {
            Err(ProvisionError::InvalidStorageType(kind)) => assert_eq!(kind, "mirror"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_render_title() {
        let storage = declaration(Some("import"), "Raw-{project}");
        assert_eq!(storage.render_title(42).unwrap(), "Raw-42");
        assert!(declaration(Some("import"), " ").render_title(1).is_err());
    }

    #[test]
    fn test_ty_alias_and_unknown_keys() {
        let storage: StorageDeclaration =
            serde_json::from_value(json!({"ty": "import", "title": "raw"})).unwrap();
        assert_eq!(storage.kind.as_deref(), Some("import"));

        let unknown = serde_json::from_value::<StorageDeclaration>(
            json!({"type": "import", "title": "raw", "colour": "red"}),
        );
        assert!(unknown.is_err());
    }
}
