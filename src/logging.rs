// ── Logging ───────────────────────────────────────────────────────────────────
//
// Installs the global `tracing` subscriber: an `EnvFilter`, a stdout layer and,
// when a log directory can be created, a daily-rolling file layer.  Library
// code only ever uses the `tracing` macros; installing a subscriber is up to
// the binary.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    config::{self, LogConfig},
    error::{Error, Result},
};

/// Log files older than this are removed at startup.
const MAX_LOG_AGE: Duration = Duration::from_secs(7 * 86_400);

/// Keeps the file writer flushing.  Drop it only when the process exits.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
    directory: Option<PathBuf>,
}

impl LogGuard {
    /// Directory the rolling file is written to, if file logging is active.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

/// Directory the log file for `app_name` goes to.
pub fn log_directory(config: &LogConfig, app_name: &str) -> Option<PathBuf> {
    config
        .directory
        .clone()
        .or_else(|| config::default_log_dir(app_name))
}

/// `RUST_LOG` if set, the configured level otherwise.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber.  Fails if one is already installed.
///
/// A log directory that cannot be created only disables the file layer.
pub fn init(config: &LogConfig, app_name: &str) -> Result<LogGuard> {
    let directory = log_directory(config, app_name);
    let appender = directory.as_deref().and_then(|dir| open_appender(dir, config));

    let (file_layer, file_guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    let active_directory = file_guard.as_ref().and(directory);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    if let Some(dir) = &active_directory {
        tracing::info!(directory = %dir.display(), "file logging enabled");
    }

    Ok(LogGuard {
        _file: file_guard,
        directory: active_directory,
    })
}

fn open_appender(dir: &Path, config: &LogConfig) -> Option<RollingFileAppender> {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("cannot create log directory {}: {e}", dir.display());
        return None;
    }
    prune_old_logs(dir, &config.file_prefix, SystemTime::now());

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| eprintln!("cannot open log file in {}: {e}", dir.display()))
        .ok()
}

/// Delete this app's log files last modified before `now - MAX_LOG_AGE`.
/// Returns how many were removed.
fn prune_old_logs(dir: &Path, prefix: &str, now: SystemTime) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    let Some(limit) = now.checked_sub(MAX_LOG_AGE) else {
        return 0;
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .filter(|entry| {
            entry.metadata().is_ok_and(|meta| {
                meta.is_file() && meta.modified().is_ok_and(|time| time < limit)
            })
        })
        .filter(|entry| fs::remove_file(entry.path()).is_ok())
        .count()
}
