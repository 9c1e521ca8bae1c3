//! Configuration loading
//!
//! Documents are layered with the `config` crate: later sources override
//! scalars of earlier ones, mappings merge key by key, and lists from a later
//! source replace earlier lists as a whole. Keys keep their case.

use crate::{Manifest, ProvisionError, Result, Settings};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment variables overriding settings,
/// e.g. `LABELSYNC__LABEL_STUDIO__ACCESS_TOKEN`
pub const ENV_PREFIX: &str = "LABELSYNC";

async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ProvisionError::io(path, e))
}

/// Load and validate the settings document, with environment overrides
pub async fn load_settings(path: &Path) -> Result<Settings> {
    let text = read_document(path).await?;
    let settings: Settings = Config::builder()
        .add_source(File::from_str(&text, FileFormat::Yaml))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

/// Merge two YAML documents into a validated manifest
pub fn merge_manifest(template: &str, overrides: &str) -> Result<Manifest> {
    let manifest: Manifest = Config::builder()
        .add_source(File::from_str(template, FileFormat::Yaml))
        .add_source(File::from_str(overrides, FileFormat::Yaml))
        .build()?
        .try_deserialize()?;
    manifest.validate()?;
    Ok(manifest)
}

/// Read the template and one override document and merge them
pub async fn load_manifest(template: &Path, overrides: &Path) -> Result<Manifest> {
    let base = read_document(template).await?;
    let top = read_document(overrides).await?;
    debug!(template = %template.display(), overrides = %overrides.display(), "merging manifest");
    merge_manifest(&base, &top).map_err(|e| match e {
        ProvisionError::ConfigParse(msg) => {
            ProvisionError::ConfigParse(format!("{}: {}", overrides.display(), msg))
        }
        other => other,
    })
}

/// YAML files directly inside `dir`, in lexical order
pub async fn discover_overrides(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ProvisionError::io(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ProvisionError::io(dir, e))?
    {
        let path = entry.path();
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_override_title_wins() {
        let manifest = merge_manifest(
            "details:\n  title: T\nstorages: []\n",
            "details:\n  title: Demo\n",
        )
        .unwrap();

        assert_eq!(manifest.title(), Some("Demo"));
        assert!(manifest.storages.is_empty());
    }

    #[test]
    fn test_mappings_merge_key_by_key() {
        let template = r##"
details:
  title: T
  show_skip_button: false
  color: "#ffffff"
model_version: base
"##;
        let overrides = r##"
details:
  title: Cats
  color: "#000000"
instruction_path: cats.html
"##;
        let manifest = merge_manifest(template, overrides).unwrap();

        assert_eq!(manifest.details.get("title"), Some(&json!("Cats")));
        assert_eq!(manifest.details.get("color"), Some(&json!("#000000")));
        assert_eq!(manifest.details.get("show_skip_button"), Some(&json!(false)));
        assert_eq!(manifest.model_version.as_deref(), Some("base"));
        assert_eq!(manifest.instruction_path, Some(PathBuf::from("cats.html")));
    }

    #[test]
    fn test_key_case_is_preserved() {
        let template = r#"
details:
  title: T
  showInstruction: true
  maximumAnnotations: 1
storages:
  - type: import
    title: raw
    ls_storage_params: {useBlobUrls: true, presignTTL: 15}
"#;
        let overrides = r#"
details:
  title: Demo
  maximumAnnotations: 3
"#;
        let manifest = merge_manifest(template, overrides).unwrap();

        assert_eq!(manifest.details.get("showInstruction"), Some(&json!(true)));
        assert_eq!(manifest.details.get("maximumAnnotations"), Some(&json!(3)));
        assert!(!manifest.details.contains_key("showinstruction"));
        let params = &manifest.storages[0].ls_storage_params;
        assert_eq!(params.get("useBlobUrls"), Some(&json!(true)));
        assert_eq!(params.get("presignTTL"), Some(&json!(15)));
    }

    #[test]
    fn test_template_storages_kept_unless_overridden() {
        let template = r#"
details: {title: T}
storages:
  - {type: import, title: "raw-{project}"}
"#;
        let manifest = merge_manifest(template, "details: {title: Dogs}\n").unwrap();
        assert_eq!(manifest.storages.len(), 1);
        assert_eq!(manifest.storages[0].title.as_deref(), Some("raw-{project}"));

        let overrides = r#"
storages:
  - {type: export, title: "only-{project}"}
"#;
        let manifest = merge_manifest(template, overrides).unwrap();
        assert_eq!(manifest.storages.len(), 1);
        assert_eq!(manifest.storages[0].kind.as_deref(), Some("export"));
        assert_eq!(manifest.storages[0].title.as_deref(), Some("only-{project}"));
    }

    #[test]
    fn test_validation_runs_after_merge() {
        let err = merge_manifest("details: {title: T}\n", "details: {title: ''}\n").unwrap_err();
        assert!(matches!(err, ProvisionError::MissingField(_)));

        let err = merge_manifest(
            "details: {title: T}\n",
            "storages:\n  - {type: sideways, title: x}\n",
        )
        .unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidStorageType(_)));
    }

    #[test]
    fn test_malformed_and_unknown_keys() {
        let err = merge_manifest("details: {title: T}\n", "details: [unclosed\n").unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigParse(_)));

        let err = merge_manifest("details: {title: T}\n", "storagez: []\n").unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigParse(_)));
    }

    #[tokio::test]
    async fn test_discover_overrides_sorted_yaml_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), "details: {title: B}\n").unwrap();
        fs::write(dir.path().join("a.yml"), "details: {title: A}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.yaml")).unwrap();

        let files = discover_overrides(dir.path()).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.yml", "b.yaml"]);
    }

    #[tokio::test]
    async fn test_load_settings_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            r#"
label_studio:
  url: http://label.local
  access_token: token
object_storage:
  endpoint: https://storage.yandexcloud.net
  region: ru-central1
  access_key_id: key
  secret_access_key: secret
"#,
        )
        .unwrap();

        let settings = load_settings(&path).await.unwrap();
        assert_eq!(settings.object_storage.bucket_name_template, "ls-{project}-{title}");
        assert!(settings.object_storage.lowercase_bucket_names);
        assert_eq!(settings.label_studio.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_missing_document_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(&dir.path().join("absent.yaml")).await.unwrap_err();
        assert!(matches!(err, ProvisionError::Io { .. }));
    }
}
