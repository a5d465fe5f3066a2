use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported input file {path}: expected .xlsx, .xlsm, .xls, .xlsb, .ods or .csv")]
    UnsupportedSource { path: PathBuf },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a single folder upload did not complete.
///
/// The orchestrator treats every variant the same way (the code lands in the
/// failure set); the distinction only shows up in the console message.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("upload command exited with {status}")]
    Status { status: ExitStatus },
}
