use std::{fs::OpenOptions, path::PathBuf, sync::Mutex, time::Instant};

use thiserror::Error;
use tracing::{info, subscriber::DefaultGuard, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::{config::Config, mcp::rpc::JsonRpcResponse};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Keeps the diagnostics subscriber installed. Dropping it uninstalls the
/// subscriber and closes the log file.
#[must_use = "logging stops when the guard is dropped"]
pub struct LoggingGuard {
    _default: DefaultGuard,
}

/// Installs stderr logging plus the optional append-only log file for the
/// current thread. stdout stays reserved for protocol frames.
pub fn init_logging(config: &Config) -> Result<LoggingGuard, LoggingError> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|err| LoggingError::InvalidFilter(err.to_string()))?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenLogFile {
                    path: path.clone(),
                    source,
                })?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);

    Ok(LoggingGuard {
        _default: tracing::subscriber::set_default(subscriber),
    })
}

/// Wraps the handling of one input line with a summary event.
pub fn with_request_logging<F>(line: &str, handle: F) -> JsonRpcResponse
where
    F: FnOnce(&str) -> JsonRpcResponse,
{
    let started_at = Instant::now();

    let response = handle(line);
    let elapsed_ms = started_at.elapsed().as_millis();

    info!(
        bytes = line.len(),
        id = %response.id,
        code = response.error_code().unwrap_or(0),
        duration_ms = elapsed_ms,
        "request summary"
    );

    if response.is_error() {
        warn!(id = %response.id, "request answered with error");
    }

    response
}
