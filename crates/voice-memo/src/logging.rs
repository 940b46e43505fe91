//! File logging for the console app.
//!
//! Log lines go to a daily-rotated file so they do not interleave with the
//! interactive prompt on stdout.

use crate::{AppError, AppResult};

use std::{fs, panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "voice_memo=debug,voice_memo_core=debug";

/// Install the global subscriber writing to `log_dir/voice-memo.log.<date>`.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive
/// for the whole run; dropping it flushes and stops the writer thread.
#[track_caller]
pub fn init_logging(log_dir: &Path) -> AppResult<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, "voice-memo.log"));

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| AppError::LoggingError {
            reason: format!("Failed to install subscriber: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    tracing::debug!(log_dir = ?log_dir, "Logging initialized");

    Ok(guard)
}
