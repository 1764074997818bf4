//! Logging setup.
//!
//! All output goes to stderr because stdout is reserved for the MCP stdio
//! transport. When a log directory is configured, a second layer writes
//! daily-rotated files there; the returned guard must stay alive for the
//! process lifetime or buffered lines are lost.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Name prefix for rotated log files.
const LOG_FILE_PREFIX: &str = "standards-mcp.log";

/// Initializes the global tracing subscriber.
///
/// `level` is the default filter, overridable through `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init(log_dir: Option<&Path>, level: &str) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            Ok(None)
        }
    }
}
