// driveupload/src/config/mod.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "DRIVEUPLOAD_CONFIG";

const DEFAULT_SPREADSHEET: &str = "codes_and_links.xlsx";
const DEFAULT_BASE_FOLDER_NAME: &str = "Downloads";
const DEFAULT_RCLONE_REMOTE: &str = "drive_unidad";

// Structs for deserializing config.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJsonConfig {
    pub spreadsheet_path: Option<PathBuf>,
    pub sheet_name: Option<String>,
    pub code_column: Option<usize>,
    pub link_column: Option<usize>,
    pub base_folder: Option<PathBuf>,
    pub rclone_remote: Option<String>,
    pub rclone_binary: Option<PathBuf>,
    pub dry_run: Option<bool>,
    pub extra_rclone_args: Option<Vec<String>>,
}

// Application's internal configuration structs
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub spreadsheet_path: PathBuf,
    pub sheet_name: Option<String>,
    pub code_column: usize,
    pub link_column: usize,
}

#[derive(Debug, Clone)]
pub struct RcloneConfig {
    pub remote: String,
    pub binary: Option<PathBuf>,
    pub dry_run: bool,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub source: SourceConfig,
    pub base_folder: PathBuf,
    pub rclone: RcloneConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` when no config file was found and defaults are in effect.
    pub config_path: Option<PathBuf>,
    pub raw_json_config: RawJsonConfig,
}

impl AppConfig {
    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        let raw_json_config: RawJsonConfig = serde_json::from_str(&config_content)
            .with_context(|| {
                format!(
                    "Failed to parse JSON from config file at {}",
                    config_path.display()
                )
            })?;

        Ok(AppConfig {
            config_path: Some(config_path.to_path_buf()),
            raw_json_config,
        })
    }

    /// Loads the config file chosen by [`resolve_config_path`].
    ///
    /// An explicitly requested file must exist. The implicit `config.json` is
    /// optional; without it every setting falls back to its default.
    pub fn load(config_path: &Path, explicit: bool) -> Result<Self> {
        if !explicit && !config_path.exists() {
            log::info!(
                "No {} found, using built-in defaults",
                config_path.display()
            );
            return Ok(AppConfig {
                config_path: None,
                raw_json_config: RawJsonConfig::default(),
            });
        }
        Self::load_from_json(config_path)
    }
}

/// Picks the config file: CLI argument first, then `DRIVEUPLOAD_CONFIG`, then
/// `config.json`. The flag is true when the path was asked for explicitly.
pub fn resolve_config_path(cli_arg: Option<String>, env_value: Option<String>) -> (PathBuf, bool) {
    match cli_arg
        .filter(|s| !s.trim().is_empty())
        .or(env_value.filter(|s| !s.trim().is_empty()))
    {
        Some(path) => (PathBuf::from(path.trim()), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    }
}

/// Applies `DRIVEUPLOAD_*` environment overrides on top of the file config.
///
/// `lookup` is `std::env::var(..).ok()` in production.
pub fn apply_env_overrides<F>(raw_config: &mut RawJsonConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup("DRIVEUPLOAD_SPREADSHEET") {
        raw_config.spreadsheet_path = Some(PathBuf::from(path));
    }
    if let Some(path) = lookup("DRIVEUPLOAD_BASE_FOLDER") {
        raw_config.base_folder = Some(PathBuf::from(path));
    }
    if let Some(remote) = lookup("DRIVEUPLOAD_REMOTE") {
        raw_config.rclone_remote = Some(remote);
    }
    if let Some(flag) = lookup("DRIVEUPLOAD_DRY_RUN") {
        raw_config.dry_run = Some(
            parse_bool_flag(&flag)
                .with_context(|| format!("DRIVEUPLOAD_DRY_RUN has an invalid value: {}", flag))?,
        );
    }
    Ok(())
}

fn parse_bool_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow::anyhow!("expected true/false, got '{}'", other)),
    }
}

/// Validates the raw config and fills in defaults.
///
/// Relative paths are resolved against `cwd`.
pub fn load_upload_config_from_json(raw_config: &RawJsonConfig, cwd: &Path) -> Result<UploadConfig> {
    let spreadsheet_path = raw_config
        .spreadsheet_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SPREADSHEET));
    if spreadsheet_path.as_os_str().is_empty() {
        return Err(AppError::Config("spreadsheet_path cannot be empty in config.json.".to_string()).into());
    }

    let code_column = raw_config.code_column.unwrap_or(0);
    let link_column = raw_config.link_column.unwrap_or(1);
    if code_column == link_column {
        return Err(AppError::Config(format!(
            "code_column and link_column must differ (both are {})",
            code_column
        ))
        .into());
    }

    let base_folder = raw_config
        .base_folder
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_FOLDER_NAME));
    if base_folder.as_os_str().is_empty() {
        return Err(AppError::Config("base_folder cannot be empty in config.json.".to_string()).into());
    }

    let remote = raw_config
        .rclone_remote
        .as_deref()
        .unwrap_or(DEFAULT_RCLONE_REMOTE)
        .trim()
        .trim_end_matches(':')
        .to_string();
    if remote.is_empty() {
        return Err(AppError::Config("rclone_remote cannot be empty in config.json.".to_string()).into());
    }

    Ok(UploadConfig {
        source: SourceConfig {
            spreadsheet_path: cwd.join(spreadsheet_path),
            sheet_name: raw_config.sheet_name.clone().filter(|s| !s.trim().is_empty()),
            code_column,
            link_column,
        },
        base_folder: cwd.join(base_folder),
        rclone: RcloneConfig {
            remote,
            binary: raw_config.rclone_binary.clone().filter(|p| !p.as_os_str().is_empty()),
            dry_run: raw_config.dry_run.unwrap_or(false),
            extra_args: raw_config.extra_rclone_args.clone().unwrap_or_default(),
        },
    })
}
