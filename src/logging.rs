//! Log setup. The terminal belongs to the TUI, so events go to a file.

use crate::error::{JobswpError, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default log location (~/.cache/jobswp/jobswp.log on Linux)
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("jobswp").join("jobswp.log"))
}

/// `RUST_LOG` if set, `info` for this crate otherwise
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobswp=info"))
}

/// Installs the global subscriber, appending to `path`
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(env_filter())
        .try_init()
        .map_err(|e| JobswpError::ConfigError(format!("Failed to install logger: {}", e)))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "jobswp starting");
    Ok(())
}
