// driveupload/src/upload/rclone.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::config::RcloneConfig;
use crate::errors::UploadError;

/// Copies a local folder to a remote destination.
pub trait UploadInvoker {
    async fn upload(&self, source: &Path, destination_id: &str) -> Result<(), UploadError>;
}

/// Uploads through `rclone copy` against a preconfigured Google Drive remote.
///
/// The destination id becomes the remote's root folder for that one call, so
/// the folder's contents land directly inside the linked Drive folder. Files
/// already present there are left alone (`--ignore-existing`).
#[derive(Debug, Clone)]
pub struct RcloneInvoker {
    program: PathBuf,
    remote: String,
    dry_run: bool,
    extra_args: Vec<String>,
}

impl RcloneInvoker {
    pub fn new(program: PathBuf, rclone_config: &RcloneConfig) -> Self {
        RcloneInvoker {
            program,
            remote: rclone_config.remote.clone(),
            dry_run: rclone_config.dry_run,
            extra_args: rclone_config.extra_args.clone(),
        }
    }

    pub fn command_args(&self, source: &Path, destination_id: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "copy".into(),
            source.as_os_str().to_os_string(),
            format!("{}:", self.remote).into(),
            "--drive-root-folder-id".into(),
            destination_id.into(),
            "--ignore-existing".into(),
            "--progress".into(),
        ];
        if self.dry_run {
            args.push("--dry-run".into());
        }
        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }
}

impl UploadInvoker for RcloneInvoker {
    async fn upload(&self, source: &Path, destination_id: &str) -> Result<(), UploadError> {
        let args = self.command_args(source, destination_id);
        log::debug!("Running {} {:?}", self.program.display(), args);

        // stdio is inherited so rclone's progress output reaches the terminal.
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|source| UploadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(UploadError::Status { status })
        }
    }
}
