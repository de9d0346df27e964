//! Tracing subscriber setup.
//!
//! Logs go either to stdout or to a daily-rotated file under the configured
//! log directory. File output is written through a non-blocking worker; the
//! returned [`LogFlusher`] has to stay alive until the process exits or the
//! last lines are lost.

use std::path::Path;

use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, InitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingSettings};

/// Suffix appended to the log file name
const LOG_FILE_SUFFIX: &str = "log";

/// Rotated log files kept on disk
const MAX_LOG_FILES: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build log file appender: {0}")]
    Appender(#[from] InitError),

    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to install global subscriber: {0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

/// Keeps the background log writer alive.
#[must_use]
pub enum LogFlusher {
    Flusher(WorkerGuard),
    NullFlusher,
}

/// Install the global tracing subscriber described by `settings`.
pub fn init_logging(settings: &LoggingSettings) -> Result<LogFlusher, LoggingError> {
    let filter = EnvFilter::try_new(&settings.filter)?;

    match &settings.directory {
        Some(dir) => init_file_logging(filter, dir, &settings.file_name, settings.format),
        None => init_stdout_logging(filter, settings.format),
    }
}

fn init_file_logging(
    filter: EnvFilter,
    dir: &Path,
    file_name: &str,
    format: LogFormat,
) -> Result<LogFlusher, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;

    let file_appender = rolling::Builder::new()
        .filename_prefix(file_name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .rotation(rolling::Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    match format {
        LogFormat::Text => set_global_default(Registry::default().with(filter).with(layer))?,
        LogFormat::Json => set_global_default(
            Registry::default()
                .with(filter)
                .with(layer.json().with_current_span(true)),
        )?,
    }

    Ok(LogFlusher::Flusher(guard))
}

fn init_stdout_logging(filter: EnvFilter, format: LogFormat) -> Result<LogFlusher, LoggingError> {
    let layer = fmt::layer();
    match format {
        LogFormat::Text => set_global_default(Registry::default().with(filter).with(layer))?,
        LogFormat::Json => set_global_default(
            Registry::default()
                .with(filter)
                .with(layer.json().with_current_span(true)),
        )?,
    }

    Ok(LogFlusher::NullFlusher)
}
