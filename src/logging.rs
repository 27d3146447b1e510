//! Diagnostics for photolens runs.
//!
//! The human-readable report is printed to stdout by the pipelines; this
//! module only wires up `tracing`. Records go to journald on Linux, else to
//! a daily file, and to stderr when neither sink can be opened.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "PHOTOLENS_LOG";

const LOG_FILE: &str = "photolens.log";

// The file writer thread stops when its guard drops.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where the rolling log file lives unless a directory is passed to `init`.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("photolens")
        .join("logs")
}

/// Filter from `PHOTOLENS_LOG`, `info` when unset or unparsable.
///
/// `PHOTOLENS_LOG=debug` shows sample raw timestamps, dropped-row counts
/// and query sizes.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(log_dir: Option<PathBuf>) -> Result<()> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(journald_layer) = tracing_journald::layer() {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(journald_layer)
                .try_init()?;

            tracing::info!("Logging to journald");
            return Ok(());
        }
    }

    let log_dir = log_dir.unwrap_or_else(default_log_dir);

    let file_appender = match open_log_file(&log_dir) {
        Ok(appender) => appender,
        Err(reason) => {
            // No journald and no writable log dir.
            tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;

            tracing::warn!("Cannot log to {:?} ({}), logging to stderr", log_dir, reason);
            return Ok(());
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = FILE_GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    tracing::info!("Logging to {:?}", log_dir.join(LOG_FILE));
    Ok(())
}

fn open_log_file(log_dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE)
        .build(log_dir)?;
    Ok(appender)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir() {
        assert!(default_log_dir().ends_with("photolens/logs"));
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");

        open_log_file(&log_dir).unwrap();
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_open_log_file_under_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        assert!(open_log_file(&blocker.join("logs")).is_err());
    }
}
