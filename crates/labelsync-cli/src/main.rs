//! labelsync - provision annotation projects and their S3 storages

use clap::Parser;
use labelsync_cli::{run, Args};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Provisioning {} onto {}",
        args.manifests.display(),
        args.template.display()
    );

    let reports = run(&args).await?;
    tracing::info!("Done: {} project(s) provisioned", reports.len());
    Ok(())
}
