use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

const LOG_ENV: &str = "TALLY_LOG";
const LOG_FILE: &str = "tally.log";

pub fn log_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("Could not find local data directory")?;
    Ok(base.join("tally"))
}

/// Route tracing output to `<data dir>/tally/tally.log`. The terminal belongs
/// to the UI, so nothing is written to stdout or stderr. Keep the returned
/// guard alive until exit so buffered lines are flushed.
pub fn init() -> Result<WorkerGuard> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::builder()
                        .with_default_directive(LevelFilter::INFO.into())
                        .with_env_var(LOG_ENV)
                        .from_env_lossy(),
                ),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
