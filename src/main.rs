use std::collections::HashSet;
use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use healthmate::config::init_config;
use healthmate::{init_tracing, FileDescriptor, UploadEvent, UploadStatus, UploadTracker};

#[derive(Parser)]
#[command(name = "healthmate", about = "Track medical document uploads through processing")]
struct Cli {
    /// Document category, e.g. "Lab Reports". Uncategorized when omitted
    #[arg(long)]
    category: Option<String>,
    /// Print the final document list as JSON
    #[arg(long)]
    json: bool,
    /// Files to submit; only name and size are read
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = init_config().context("Failed to load config")?;
    init_tracing(&config.logging.level);

    let mut descriptors = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("No file name in {}", path.display()))?;

        let descriptor = FileDescriptor::new(name, metadata.len());
        if !descriptor.is_supported_format() {
            tracing::warn!(name = %descriptor.name, "Format outside PDF, JPG, PNG, DOC, DOCX");
        }
        if descriptor.exceeds_size_guideline() {
            tracing::warn!(name = %descriptor.name, size = descriptor.size_bytes, "File exceeds 10MB guideline");
        }
        descriptors.push(descriptor);
    }

    let handle = UploadTracker::new(&config.upload);
    let tracker = handle.tracker.clone();
    let mut events = tracker.subscribe_events();

    let ids = tracker
        .submit_labeled(descriptors, cli.category.as_deref())
        .await
        .context("Submit failed")?;
    let mut pending: HashSet<_> = ids.into_iter().collect();

    while !pending.is_empty() {
        match events.recv().await {
            Ok(UploadEvent::StatusChanged { upload_id, new_status: UploadStatus::Processed, .. }) => {
                pending.remove(&upload_id);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event stream lagged, re-reading document list");
                let files = tracker.list_files().await?;
                pending.retain(|id| {
                    files.iter().any(|f| f.id == *id && f.status != UploadStatus::Processed)
                });
            }
            Err(RecvError::Closed) => break,
        }
    }

    let files = tracker.list_files().await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        for file in &files {
            println!(
                "{}  {}  {}  {}  {}",
                file.intake_date, file.status, file.category, file.display_size(), file.name
            );
        }
    }

    handle.shutdown().await?;
    Ok(())
}
