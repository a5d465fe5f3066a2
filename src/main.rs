//! Drive Folder Upload Tool
//!
//! Reads a spreadsheet of folder codes and Google Drive folder links and
//! uploads each local folder to its linked Drive folder with rclone.

// driveupload/src/main.rs
mod config;
mod errors;
mod source;
mod upload;
mod utils;

use anyhow::{Context, Result};
use config::{AppConfig, CONFIG_PATH_ENV, apply_env_overrides, load_upload_config_from_json, resolve_config_path};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit code when the run finished but some folders failed or were skipped by Ctrl-C.
const EXIT_PARTIAL_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run_app().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_PARTIAL_FAILURE),
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every attempted upload completed.
async fn run_app() -> Result<bool> {
    let (config_path, explicit) = resolve_config_path(env::args().nth(1), env::var(CONFIG_PATH_ENV).ok());
    let mut app_config = AppConfig::load(&config_path, explicit)
        .context(format!("Failed to load application configuration from {}", config_path.display()))?;
    if let Some(path) = &app_config.config_path {
        log::info!("Loaded configuration from {}", path.display());
    }

    apply_env_overrides(&mut app_config.raw_json_config, |key| env::var(key).ok())?;

    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let upload_config = load_upload_config_from_json(&app_config.raw_json_config, &cwd)
        .context("Failed to load upload configuration")?;
    log::debug!("Upload configuration: {:?}", upload_config);

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.store(true, Ordering::SeqCst);
            eprintln!("\n🛑 Ctrl-C received, stopping after the current folder...");
        }
    });

    println!("🚀 Starting upload to Drive remote '{}'...", upload_config.rclone.remote);
    let report = upload::run_upload_flow(&upload_config, cancel)
        .await
        .context("Upload process failed")?;
    Ok(report.is_success())
}
