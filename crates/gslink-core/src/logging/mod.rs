//! Structured logging with `tracing`.
//!
//! This module provides:
//! - [`init_subscriber`] for stderr-only output (headless runs)
//! - [`init_subscriber_with_file`] for a persistent log file that keeps the
//!   tail of the previous run
//! - [`capture_logs`] for asserting on emitted events in tests
//!
//! Both initializers honor `RUST_LOG` and fall back to the given level.

pub mod file;
pub mod test_utils;

use std::io;
use std::path::Path;

pub use file::{MAX_PREVIOUS_LOG_BYTES, RUN_SEPARATOR, open_log_file, tail_previous_log};
pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

/// Initialize the global tracing subscriber with stderr output only.
///
/// Call once at application startup. Subsequent calls are no-ops.
///
/// # Arguments
///
/// * `level` - Minimum log level to display when `RUST_LOG` is unset.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}

/// Initialize the global tracing subscriber writing to a log file.
///
/// The previous contents of `path` are trimmed to their last
/// [`MAX_PREVIOUS_LOG_BYTES`] and kept above a [`RUN_SEPARATOR`] line. With
/// `echo_stderr` set, every line is also written to stderr.
///
/// Fails only if the log file cannot be opened; the subscriber is not
/// installed in that case.
pub fn init_subscriber_with_file(level: &str, path: &Path, echo_stderr: bool) -> io::Result<()> {
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let file = open_log_file(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact();

    let stderr_layer = echo_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(io::stderr)
            .compact()
            .boxed()
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
