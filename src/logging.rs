//! Tracing subscriber setup
//!
//! The terminal belongs to the TUI, so log output goes to a file:
//! `--log-file` if given, otherwise `<state dir>/flicksort/flicksort.log`
//! (falling back to the cache dir, then the temp dir). `RUST_LOG` overrides
//! the default `info` filter.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Default log file location
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("flicksort")
        .join("flicksort.log")
}

/// Installs the global subscriber writing to `log_path`.
///
/// Fails if the file cannot be created; the caller decides whether running
/// without a log is acceptable.
pub fn init(log_path: &Path) -> io::Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = File::create(log_path)?;

    build_subscriber(log_file)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}

/// Subscriber shared by the binary and tests
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer)
}
