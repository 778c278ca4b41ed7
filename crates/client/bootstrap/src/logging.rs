//! Logging setup for the agent binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Keeps the file writer alive; logs are flushed when it is dropped.
pub struct LoggingGuard {
    _file: WorkerGuard,
    pub log_file: PathBuf,
}

/// Installs the global subscriber.
///
/// Always writes to `{log_dir}/{session_id}/agent.log`; with `stderr` set,
/// also writes to standard error. `RUST_LOG` overrides the default `info`
/// level.
pub fn setup_logging(log_dir: &Path, session_id: &str, stderr: bool) -> Result<LoggingGuard> {
    let session_log_dir = log_dir.join(session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!("cannot create log directory {}", session_log_dir.display())
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "agent.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("logging was already initialized")?;

    let log_file = session_log_dir.join("agent.log");
    tracing::info!(session = session_id, "Logging initialized");
    tracing::info!("Log file: {}", log_file.display());

    Ok(LoggingGuard {
        _file: guard,
        log_file,
    })
}
