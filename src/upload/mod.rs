pub(crate) mod logic;
pub(crate) mod normalize;
pub(crate) mod rclone;
pub(crate) mod report;
pub(crate) mod resolve;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::config::UploadConfig;
use crate::source;
use crate::utils::find_rclone_executable;
use logic::{BatchOrchestrator, BatchReport};
use normalize::RowNormalizer;
use rclone::RcloneInvoker;
use resolve::LocalFolderResolver;

/// Public entry point for the upload process.
///
/// Startup problems (no rclone, no base folder, unreadable spreadsheet) are
/// returned as errors. Per-folder problems end up in the returned report.
pub async fn run_upload_flow(upload_config: &UploadConfig, cancel: Arc<AtomicBool>) -> Result<BatchReport> {
    let rclone_path = find_rclone_executable(upload_config.rclone.binary.as_deref())?;
    println!("Found rclone executable at: {}", rclone_path.display());

    if !upload_config.base_folder.is_dir() {
        anyhow::bail!(
            "Base folder {} does not exist or is not a directory",
            upload_config.base_folder.display()
        );
    }

    let rows = source::read_rows(&upload_config.source).with_context(|| {
        format!(
            "Failed to read rows from {}",
            upload_config.source.spreadsheet_path.display()
        )
    })?;
    println!(
        "📋 Loaded {} rows from {}",
        rows.len(),
        upload_config.source.spreadsheet_path.display()
    );
    if upload_config.rclone.dry_run {
        println!("🧪 Dry run: rclone will not transfer any files.");
    }

    let orchestrator = BatchOrchestrator::new(
        RowNormalizer::new()?,
        LocalFolderResolver::new(&upload_config.base_folder),
        RcloneInvoker::new(rclone_path, &upload_config.rclone),
    )
    .with_cancel_flag(cancel);

    let report = orchestrator.run(&rows).await;
    report::print_summary(&report);
    Ok(report)
}
