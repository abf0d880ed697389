use crate::persistence::log_file;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "TASKFLOW_LOG";

/// Default filter when `$TASKFLOW_LOG` is unset or invalid
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber, appending to `taskflow.log`
/// inside `dir`. The terminal belongs to the TUI, so nothing goes to stderr.
///
/// Subsequent calls are no-ops.
pub fn init_logging(dir: &Path) -> Result<()> {
    let path = log_file(dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    // try_init fails only if a subscriber is already set
    let _ = subscriber.try_init();
    Ok(())
}
