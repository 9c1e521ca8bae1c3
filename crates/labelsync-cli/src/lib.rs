//! # labelsync
//!
//! Provisions annotation projects from a template plus one override document
//! per project, then creates their S3 buckets and binds them as import or
//! export storages.

use anyhow::Context;
use clap::Parser;
use labelsync_core::{load_settings, ProvisionReport, Provisioner, Settings};
use labelsync_storage::ObjectStorageClient;
use labelsync_studio::StudioClient;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "labelsync")]
#[command(about = "Provision annotation projects and their S3 storages")]
#[command(version)]
pub struct Args {
    /// Credentials and endpoints for both services
    #[arg(short, long, default_value = "config.yaml", env = "LABELSYNC_CONFIG")]
    pub config: PathBuf,

    /// Template every manifest is merged onto
    #[arg(short, long, default_value = "template.yaml", env = "LABELSYNC_TEMPLATE")]
    pub template: PathBuf,

    /// Directory of per-project override documents
    #[arg(short, long, default_value = "manifests", env = "LABELSYNC_MANIFESTS")]
    pub manifests: PathBuf,

    /// Enable debug logging
    #[arg(short, long, env = "LABELSYNC_DEBUG")]
    pub debug: bool,
}

impl Args {
    /// Default log filter directive for the chosen verbosity.
    /// Targets match by prefix, so this covers every `labelsync_*` crate.
    pub fn log_filter(&self) -> String {
        let level = if self.debug { "debug" } else { "info" };
        format!("labelsync={level}")
    }
}

/// Build both clients from validated settings
pub fn clients(settings: &Settings) -> anyhow::Result<(StudioClient, ObjectStorageClient)> {
    let studio = StudioClient::new(settings.studio_config())
        .context("invalid Label Studio settings")?;
    let storage = ObjectStorageClient::new(settings.storage_config())
        .context("invalid object storage settings")?;
    Ok((studio, storage))
}

/// Load settings and provision every manifest
pub async fn run(args: &Args) -> anyhow::Result<Vec<ProvisionReport>> {
    let settings = load_settings(&args.config)
        .await
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    let (studio, storage) = clients(&settings)?;

    info!("Label Studio: {}", settings.label_studio.url);
    info!("Object storage: {}", settings.object_storage.endpoint);

    let provisioner = Provisioner {
        projects: &studio,
        links: &studio,
        buckets: &storage,
        storage: &settings.object_storage,
    };
    let reports = provisioner.run(&args.template, &args.manifests).await?;

    for report in &reports {
        info!(
            "Project `{}` (id {}) {} with {} bucket(s)",
            report.title,
            report.project_id,
            if report.created { "created" } else { "updated" },
            report.buckets.len()
        );
    }
    Ok(reports)
}
