//! # gslink-agent
//!
//! Headless gslink binary: loads the launcher settings, opens the request
//! channel in the game's save directory and answers requests until Ctrl-C.

#![deny(unsafe_code)]

mod fake_gs;
mod handler;
mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use gslink_ipc::{Ipc, IpcConfig};
use gslink_settings::{Settings, load_settings_from_path, save_settings_to_path};
use tracing::{info, warn};

use crate::handler::LauncherHandler;

/// GrooveStats launcher, headless mode.
#[derive(Parser, Debug)]
#[command(name = "gslink-agent", version, about = "Answers game requests over the filesystem channel")]
struct Cli {
    /// Channel directory (defaults to `<SmDataDir>/Save/GrooveStats`).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Settings file (defaults to the per-user config location).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also log to a file, keeping the tail of the previous run. Without a
    /// value, the per-user cache location is used.
    #[arg(long)]
    #[allow(clippy::option_option)]
    log_file: Option<Option<PathBuf>>,
}

impl Cli {
    fn settings_path(&self) -> Result<PathBuf> {
        match &self.settings {
            Some(path) => Ok(path.clone()),
            None => gslink_settings::settings_path().context("Failed to locate settings file"),
        }
    }

    fn log_path(&self) -> Result<Option<PathBuf>> {
        match &self.log_file {
            None => Ok(None),
            Some(Some(path)) => Ok(Some(path.clone())),
            Some(None) => gslink_settings::paths::log_path()
                .map(Some)
                .context("Failed to locate log directory"),
        }
    }

    fn ipc_config(&self, settings: &Settings) -> IpcConfig {
        IpcConfig::new(self.base_dir.clone().unwrap_or_else(|| settings.ipc_dir()))
    }
}

/// Load settings, writing defaults on first launch.
fn bootstrap_settings(path: &std::path::Path) -> Result<Settings> {
    let settings = load_settings_from_path(path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    if settings.first_launch {
        info!(path = %path.display(), "writing default settings file");
        save_settings_to_path(&settings, path).context("Failed to write settings")?;
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // The debug switch decides whether file logs are echoed to stderr, so
    // settings are read before logging is up and bootstrapped after.
    let settings_path = args.settings_path()?;
    let echo_stderr = load_settings_from_path(&settings_path)
        .map(|s| s.debug.debug)
        .unwrap_or(true);
    match args.log_path()? {
        Some(log_path) => {
            gslink_core::logging::init_subscriber_with_file(&args.log_level, &log_path, echo_stderr)
                .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        }
        None => gslink_core::logging::init_subscriber(&args.log_level),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "GrooveStats launcher (headless mode)"
    );

    let settings = bootstrap_settings(&settings_path)?;
    if settings.debug.debug {
        warn!(url = %settings.debug.groovestats_url, fake_gs = settings.debug.fake_gs, "debug mode enabled");
    }

    let (ipc, queue) =
        Ipc::start(&args.ipc_config(&settings)).context("Failed to start request channel")?;
    let handler = Arc::new(LauncherHandler::new(&settings.debug));
    let mut consumer = tokio::spawn(serve::consume(queue, ipc.responses(), handler));

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for ctrl-c")?;
            info!("Shutting down...");
        }
        done = &mut consumer => {
            // the queue only closes early if the worker died
            warn!(?done, "request consumer ended unexpectedly");
            return Ok(());
        }
    }

    ipc.close();
    ipc.closed().await;
    if let Err(e) = consumer.await {
        warn!(error = %e, "request consumer failed");
    }

    info!("Shutdown complete");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["gslink-agent"]);
        assert_eq!(cli.log_level, "info");
        assert!(cli.base_dir.is_none());
        assert!(cli.log_path().unwrap().is_none());
    }

    #[test]
    fn cli_log_file_with_value() {
        let cli = Cli::parse_from(["gslink-agent", "--log-file", "/tmp/gs.log"]);
        assert_eq!(cli.log_path().unwrap(), Some(PathBuf::from("/tmp/gs.log")));
    }

    #[test]
    fn cli_bare_log_file_uses_default_location() {
        let cli = Cli::parse_from(["gslink-agent", "--log-file"]);
        assert_eq!(cli.log_file, Some(None));
    }

    #[test]
    fn base_dir_overrides_settings() {
        let settings = Settings {
            sm_data_dir: PathBuf::from("/data/sm"),
            ..Settings::default()
        };
        let cli = Cli::parse_from(["gslink-agent"]);
        assert_eq!(cli.ipc_config(&settings).base_dir, settings.ipc_dir());

        let cli = Cli::parse_from(["gslink-agent", "--base-dir", "/tmp/ipc"]);
        assert_eq!(cli.ipc_config(&settings).base_dir, PathBuf::from("/tmp/ipc"));
    }

    #[test]
    fn explicit_settings_path() {
        let cli = Cli::parse_from(["gslink-agent", "--settings", "/tmp/s.json"]);
        assert_eq!(cli.settings_path().unwrap(), PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn first_launch_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = bootstrap_settings(&path).unwrap();
        assert!(settings.first_launch);
        assert!(path.exists());

        let again = bootstrap_settings(&path).unwrap();
        assert!(!again.first_launch);
        assert_eq!(again.sm_data_dir, settings.sm_data_dir);
    }

    #[test]
    fn invalid_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = bootstrap_settings(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load settings"));
    }
}
