// driveupload/src/upload/report.rs
use chrono::{DateTime, Local};
use std::path::Path;

use super::logic::{BatchReport, UploadOutcome};

pub fn print_upload_banner(code: &str, local_path: &Path, file_count: usize, destination_id: &str) {
    println!("\n======================================");
    println!("📁 Uploading folder: {}", code);
    println!("📂 Local path: {}", local_path.display());
    println!("📄 Files inside: {}", file_count);
    println!("🎯 Drive destination (ID): {}", destination_id);
    println!("======================================\n");
}

pub fn print_summary(report: &BatchReport) {
    print!("{}", render_summary(report, Local::now()));
}

/// Builds the end-of-run summary shown after the last folder.
pub fn render_summary(report: &BatchReport, finished_at: DateTime<Local>) -> String {
    let mut lines = vec![
        String::new(),
        "===== SUMMARY =====".to_string(),
        format!("Finished at: {}", finished_at.format("%Y-%m-%d %H:%M:%S")),
        format!(
            "Rows read: {} (skipped: {}, without Drive ID: {})",
            report.rows_read,
            report.rows_filtered,
            report.diagnostics.len()
        ),
        format!(
            "Uploaded: {}, not found locally: {}, failed: {}",
            report.count(UploadOutcome::Completed),
            report.count(UploadOutcome::NotFound),
            report.count(UploadOutcome::Failed)
        ),
    ];

    let not_found = report.codes_with(UploadOutcome::NotFound);
    if !not_found.is_empty() {
        lines.push(format!("Folders not found locally: {}", not_found.join(", ")));
    }

    if report.interrupted {
        lines.push(format!(
            "🛑 Run interrupted: {} folder(s) were not attempted.",
            report.not_attempted
        ));
    }

    lines.push(format!("Folders that failed to upload: {}", report.failed.len()));
    if !report.failed.is_empty() {
        lines.push("These folders could not be uploaded:".to_string());
        lines.extend(
            report
                .results
                .iter()
                .filter(|r| r.outcome == UploadOutcome::Failed)
                .map(|r| format!("- {} (row {}, Drive ID {})", r.code, r.row_number, r.destination_id)),
        );
    } else if !report.interrupted {
        lines.push("✅ All folders uploaded successfully.".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
