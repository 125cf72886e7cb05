use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub(crate) const LOG_FILE: &str = "tallytui.log";

/// Sends all tracing output to `<data_dir>/tallytui.log`; the terminal belongs
/// to the TUI. `RUST_LOG` wins over `default_filter`.
pub(crate) fn init(data_dir: &Path, default_filter: &str) -> Result<()> {
    let path = data_dir.join(LOG_FILE);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Could not open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_log = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(file_log.with_filter(filter))
        .try_init()
        .context("Could not install the tracing subscriber")?;

    tracing::debug!("logging to {}", path.display());
    Ok(())
}
