//! File logging. The terminal belongs to the UI, so nothing is written there.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{WrapErr, eyre};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `DEMANUAL_LOG=debug`.
pub const FILTER_ENV: &str = "DEMANUAL_LOG";

const DEFAULT_FILTER: &str = "info";

/// Append log records to `path`, creating its directory if needed.
pub fn init(path: &Path) -> color_eyre::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))
}
