use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use which::which;

/// Finds the rclone executable, either the configured one or the first on PATH.
pub fn find_rclone_executable(configured: Option<&Path>) -> Result<PathBuf> {
    match configured {
        Some(path) => which(path).with_context(|| {
            format!("Configured rclone_binary {} is not an executable file.", path.display())
        }),
        None => which("rclone").context(
            "rclone executable not found in PATH. Please install rclone and configure the Drive remote before running.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_binary_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let result = find_rclone_executable(Some(&dir.path().join("rclone")));
        assert!(result.is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_binary_is_used_when_executable() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let binary = dir.path().join("rclone");
        std::fs::write(&binary, "#!/bin/sh\nexit 0\n")?;
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755))?;

        let found = find_rclone_executable(Some(&binary))?;
        assert!(found.ends_with("rclone"));
        Ok(())
    }
}
