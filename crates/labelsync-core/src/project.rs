//! Project reconciliation

use crate::remote::{ProjectRemote, Upsert};
use crate::{Manifest, ProvisionError, Result};
use labelsync_studio::Project;
use serde_json::Value;
use tracing::info;

/// Project attribute receiving the text of `instruction_path`
pub const INSTRUCTION_KEY: &str = "expert_instruction";

/// Create the manifest's project or update the one with the same title.
///
/// The whole attribute map is sent either way. When the manifest declares a
/// `model_version`, it is set with a separate partial update afterwards.
pub async fn reconcile(remote: &dyn ProjectRemote, manifest: &Manifest) -> Result<Upsert<Project>> {
    let title = manifest
        .title()
        .ok_or_else(|| ProvisionError::MissingField("details.title".to_string()))?;

    let mut attributes = manifest.details.clone();
    if let Some(path) = &manifest.instruction_path {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ProvisionError::io(path, e))?;
        attributes.insert(INSTRUCTION_KEY.to_string(), Value::String(text));
    }

    let outcome = remote.create_or_update_project(title, &attributes).await?;
    match &outcome {
        Upsert::Created(p) => info!("Created project `{}` (id {})", title, p.id),
        Upsert::Updated(p) => info!("Updated project `{}` (id {})", title, p.id),
    }

    if let Some(version) = &manifest.model_version {
        let id = outcome.get().id;
        info!("Setting model version `{}` on project {}", version, id);
        remote.set_model_version(id, version).await?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryStudio, StudioCall};
    use serde_json::json;

    fn manifest(title: &str) -> Manifest {
        let mut m = Manifest::default();
        m.details.insert("title".into(), json!(title));
        m.details.insert("label_config".into(), json!("<View/>"));
        m
    }

    #[tokio::test]
    async fn test_creates_when_absent() {
        let studio = MemoryStudio::new().with_project(1, "Other");
        let outcome = reconcile(&studio, &manifest("Demo")).await.unwrap();

        assert!(outcome.is_created());
        assert_eq!(studio.count(|c| matches!(c, StudioCall::CreateProject(_))), 1);
        assert_eq!(studio.count(|c| matches!(c, StudioCall::UpdateProject(..))), 0);
    }

    #[tokio::test]
    async fn test_updates_when_title_matches() {
        let studio = MemoryStudio::new().with_project(8, "Demo");
        let outcome = reconcile(&studio, &manifest("Demo")).await.unwrap();

        assert_eq!(outcome, Upsert::Updated(Project { id: 8, title: Some("Demo".into()) }));
        assert_eq!(studio.count(|c| matches!(c, StudioCall::CreateProject(_))), 0);
        match &studio.calls()[1] {
            StudioCall::UpdateProject(8, attrs) => {
                assert_eq!(attrs["label_config"], json!("<View/>"))
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_title_match_is_case_sensitive() {
        let studio = MemoryStudio::new().with_project(8, "demo");
        let outcome = reconcile(&studio, &manifest("Demo")).await.unwrap();
        assert!(outcome.is_created());
    }

    #[tokio::test]
    async fn test_missing_title_makes_no_calls() {
        let studio = MemoryStudio::new();
        let err = reconcile(&studio, &Manifest::default()).await.unwrap_err();
        assert!(matches!(err, ProvisionError::MissingField(_)));
        assert!(studio.calls().is_empty());
    }

    #[tokio::test]
    async fn test_instruction_is_injected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instruction.html");
        std::fs::write(&path, "<p>Label every cat</p>").unwrap();

        let mut m = manifest("Demo");
        m.instruction_path = Some(path);
        let studio = MemoryStudio::new();
        reconcile(&studio, &m).await.unwrap();

        match &studio.calls()[1] {
            StudioCall::CreateProject(attrs) => {
                assert_eq!(attrs[INSTRUCTION_KEY], json!("<p>Label every cat</p>"))
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreadable_instruction_is_io_error() {
        let mut m = manifest("Demo");
        m.instruction_path = Some("/definitely/not/here.html".into());
        let studio = MemoryStudio::new();

        let err = reconcile(&studio, &m).await.unwrap_err();
        assert!(matches!(err, ProvisionError::Io { .. }));
        assert!(studio.calls().is_empty());
    }

    #[tokio::test]
    async fn test_model_version_set_separately() {
        let mut m = manifest("Demo");
        m.model_version = Some("yolo-v8".to_string());
        let studio = MemoryStudio::new().with_project(3, "Demo");

        reconcile(&studio, &m).await.unwrap();

        assert_eq!(
            studio.calls().last(),
            Some(&StudioCall::SetModelVersion(3, "yolo-v8".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_failure_is_fatal() {
        let studio = MemoryStudio::new().failing_creates();
        let err = reconcile(&studio, &manifest("Demo")).await.unwrap_err();
        assert!(err.is_remote());
    }
}
