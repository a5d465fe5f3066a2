// driveupload/src/upload/logic.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::normalize::{NormalizedRow, RowNormalizer, UploadTarget};
use super::rclone::UploadInvoker;
use super::report::print_upload_banner;
use super::resolve::{FolderLookup, FolderResolver};
use crate::source::Row;

/// Final state of one code. Every code starts pending and moves to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Completed,
    Failed,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeResult {
    pub row_number: usize,
    pub code: String,
    pub destination_id: String,
    pub outcome: UploadOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub results: Vec<CodeResult>,
    /// Codes whose upload command failed, in processing order.
    pub failed: Vec<String>,
    /// One message per row whose link had no extractable folder id.
    pub diagnostics: Vec<String>,
    pub rows_read: usize,
    pub rows_filtered: usize,
    pub interrupted: bool,
    /// Codes never attempted because the run was interrupted.
    pub not_attempted: usize,
}

impl BatchReport {
    pub fn count(&self, outcome: UploadOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn codes_with(&self, outcome: UploadOutcome) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.outcome == outcome)
            .map(|r| r.code.as_str())
            .collect()
    }

    /// True when nothing failed and the whole input was processed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.interrupted
    }
}

/// Drives rows through normalize -> resolve -> upload, one folder at a time.
///
/// Uploads share bandwidth and destination, so they never overlap.
pub struct BatchOrchestrator<R, I> {
    normalizer: RowNormalizer,
    resolver: R,
    invoker: I,
    cancel: Arc<AtomicBool>,
}

impl<R: FolderResolver, I: UploadInvoker> BatchOrchestrator<R, I> {
    pub fn new(normalizer: RowNormalizer, resolver: R, invoker: I) -> Self {
        BatchOrchestrator {
            normalizer,
            resolver,
            invoker,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Uses `cancel` as the stop flag. It is checked before each folder.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn run(&self, rows: &[Row]) -> BatchReport {
        let mut report = BatchReport {
            rows_read: rows.len(),
            ..BatchReport::default()
        };

        'rows: for (row_index, row) in rows.iter().enumerate() {
            let targets = match self.normalizer.normalize(row) {
                NormalizedRow::Filtered => {
                    log::debug!("Skipping row {}: not an upload row", row.number);
                    report.rows_filtered += 1;
                    continue;
                }
                NormalizedRow::MissingDestination => {
                    let diagnostic = format!(
                        "Could not extract Drive ID from row {}: [{:?}, {:?}]",
                        row.number, row.codes_field, row.link_field
                    );
                    println!("{}", diagnostic);
                    report.diagnostics.push(diagnostic);
                    continue;
                }
                NormalizedRow::Targets(targets) => targets,
            };

            for (target_index, target) in targets.iter().enumerate() {
                if self.cancel.load(Ordering::SeqCst) {
                    report.interrupted = true;
                    report.not_attempted =
                        targets.len() - target_index + self.count_targets(&rows[row_index + 1..]);
                    println!(
                        "🛑 Stopping before {}: run interrupted, {} folder(s) not attempted.",
                        target.code, report.not_attempted
                    );
                    break 'rows;
                }

                let outcome = self.process_target(target).await;
                if outcome == UploadOutcome::Failed {
                    report.failed.push(target.code.clone());
                }
                report.results.push(CodeResult {
                    row_number: row.number,
                    code: target.code.clone(),
                    destination_id: target.destination_id.clone(),
                    outcome,
                });
            }
        }

        report
    }

    async fn process_target(&self, target: &UploadTarget) -> UploadOutcome {
        let (path, file_count) = match self.resolver.resolve(&target.code) {
            FolderLookup::Found { path, file_count } => (path, file_count),
            FolderLookup::NotFound => {
                println!("⚠️ Folder not found: {}", target.code);
                return UploadOutcome::NotFound;
            }
        };

        print_upload_banner(&target.code, &path, file_count, &target.destination_id);

        match self.invoker.upload(&path, &target.destination_id).await {
            Ok(()) => {
                println!("✅ Upload completed: {}", target.code);
                UploadOutcome::Completed
            }
            Err(e) => {
                eprintln!(
                    "❌ ERROR uploading {} to {}: {}",
                    target.code, target.destination_id, e
                );
                UploadOutcome::Failed
            }
        }
    }

    fn count_targets(&self, rows: &[Row]) -> usize {
        rows.iter()
            .map(|row| match self.normalizer.normalize(row) {
                NormalizedRow::Targets(targets) => targets.len(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UploadError;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::path::{Path, PathBuf};

    const LINK_XYZ: &str = "https://drive.google.com/drive/folders/XYZ?usp=sharing";

    /// Pretends `base/<code>` exists for the listed codes.
    struct FakeResolver {
        base: PathBuf,
        folders: HashMap<String, usize>,
        lookups: RefCell<Vec<String>>,
    }

    impl FakeResolver {
        fn with_folders(folders: &[(&str, usize)]) -> Self {
            FakeResolver {
                base: PathBuf::from("/data/Downloads"),
                folders: folders.iter().map(|(c, n)| (c.to_string(), *n)).collect(),
                lookups: RefCell::new(Vec::new()),
            }
        }
    }

    impl FolderResolver for FakeResolver {
        fn resolve(&self, code: &str) -> FolderLookup {
            self.lookups.borrow_mut().push(code.to_string());
            match self.folders.get(code) {
                Some(&file_count) => FolderLookup::Found {
                    path: self.base.join(code),
                    file_count,
                },
                None => FolderLookup::NotFound,
            }
        }
    }

    /// Records every call; uploads of the listed codes fail.
    #[derive(Default)]
    struct FakeInvoker {
        failing: HashSet<String>,
        calls: RefCell<Vec<(PathBuf, String)>>,
        cancel_after_call: Option<Arc<AtomicBool>>,
    }

    impl FakeInvoker {
        fn failing(codes: &[&str]) -> Self {
            FakeInvoker {
                failing: codes.iter().map(|c| c.to_string()).collect(),
                ..FakeInvoker::default()
            }
        }
    }

    impl UploadInvoker for FakeInvoker {
        async fn upload(&self, source: &Path, destination_id: &str) -> Result<(), UploadError> {
            self.calls
                .borrow_mut()
                .push((source.to_path_buf(), destination_id.to_string()));
            if let Some(flag) = &self.cancel_after_call {
                flag.store(true, Ordering::SeqCst);
            }
            let code = source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if self.failing.contains(&code) {
                return Err(UploadError::Spawn {
                    program: PathBuf::from("rclone"),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            Ok(())
        }
    }

    fn orchestrator(
        resolver: FakeResolver,
        invoker: FakeInvoker,
    ) -> BatchOrchestrator<FakeResolver, FakeInvoker> {
        BatchOrchestrator::new(RowNormalizer::new().expect("patterns compile"), resolver, invoker)
    }

    #[tokio::test]
    async fn test_suffixed_code_uploads_to_row_destination() {
        let orch = orchestrator(FakeResolver::with_folders(&[("200", 3)]), FakeInvoker::default());
        let report = orch.run(&[Row::new(1, "200_old", LINK_XYZ)]).await;

        assert_eq!(
            *orch.invoker.calls.borrow(),
            vec![(PathBuf::from("/data/Downloads/200"), "XYZ".to_string())]
        );
        assert_eq!(
            report.results,
            vec![CodeResult {
                row_number: 1,
                code: "200".to_string(),
                destination_id: "XYZ".to_string(),
                outcome: UploadOutcome::Completed,
            }]
        );
        assert!(report.failed.is_empty());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_row_without_link_never_touches_resolver_or_invoker() {
        let orch = orchestrator(FakeResolver::with_folders(&[("301", 1)]), FakeInvoker::default());
        let report = orch.run(&[Row::new(1, "301", "")]).await;

        assert!(orch.resolver.lookups.borrow().is_empty());
        assert!(orch.invoker.calls.borrow().is_empty());
        assert!(report.results.is_empty());
        assert_eq!(report.rows_filtered, 1);
        assert!(report.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_failed_and_missing_codes_are_reported_separately() {
        let orch = orchestrator(
            FakeResolver::with_folders(&[("101", 4)]),
            FakeInvoker::failing(&["101"]),
        );
        let report = orch.run(&[Row::new(1, "101, 102", LINK_XYZ)]).await;

        assert_eq!(report.failed, vec!["101"]);
        assert_eq!(report.codes_with(UploadOutcome::NotFound), vec!["102"]);
        assert_eq!(report.count(UploadOutcome::Completed), 0);
        assert_eq!(orch.invoker.calls.borrow().len(), 1);
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_unextractable_link_emits_one_diagnostic() {
        let orch = orchestrator(FakeResolver::with_folders(&[("101", 1)]), FakeInvoker::default());
        let report = orch
            .run(&[Row::new(7, "101,102", "https://drive.google.com/open?id=abc")])
            .await;

        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("row 7"));
        assert!(report.results.is_empty());
        assert!(orch.resolver.lookups.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_rows_and_codes_are_processed_in_source_order() {
        let orch = orchestrator(
            FakeResolver::with_folders(&[("1", 1), ("2", 1), ("3", 1)]),
            FakeInvoker::default(),
        );
        let rows = vec![
            Row::new(1, "3", "https://x/folders/C"),
            Row::new(2, "Header", "Link"),
            Row::new(3, "2-1", "https://x/folders/AB"),
        ];
        let report = orch.run(&rows).await;

        let calls: Vec<(String, String)> = orch
            .invoker
            .calls
            .borrow()
            .iter()
            .map(|(p, d)| (p.file_name().unwrap().to_string_lossy().to_string(), d.clone()))
            .collect();
        assert_eq!(
            calls,
            vec![
                ("3".to_string(), "C".to_string()),
                ("2".to_string(), "AB".to_string()),
                ("1".to_string(), "AB".to_string()),
            ]
        );
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_filtered, 1);
    }

    #[tokio::test]
    async fn test_rerun_yields_same_failure_set() {
        let rows = vec![
            Row::new(1, "10 11", LINK_XYZ),
            Row::new(2, "12", LINK_XYZ),
        ];
        let orch = orchestrator(
            FakeResolver::with_folders(&[("10", 1), ("11", 1), ("12", 1)]),
            FakeInvoker::failing(&["11"]),
        );

        let first = orch.run(&rows).await;
        let second = orch.run(&rows).await;
        assert_eq!(first.failed, second.failed);
        assert_eq!(first.results, second.results);
    }

    #[tokio::test]
    async fn test_cancel_stops_before_next_folder() {
        let cancel = Arc::new(AtomicBool::new(false));
        let invoker = FakeInvoker {
            cancel_after_call: Some(cancel.clone()),
            ..FakeInvoker::default()
        };
        let orch = orchestrator(
            FakeResolver::with_folders(&[("1", 1), ("2", 1), ("3", 1)]),
            invoker,
        )
        .with_cancel_flag(cancel);

        let rows = vec![Row::new(1, "1,2", LINK_XYZ), Row::new(2, "3", LINK_XYZ)];
        let report = orch.run(&rows).await;

        assert_eq!(orch.invoker.calls.borrow().len(), 1);
        assert!(report.interrupted);
        assert_eq!(report.not_attempted, 2);
        assert_eq!(report.count(UploadOutcome::Completed), 1);
        assert!(!report.is_success());
    }
}
