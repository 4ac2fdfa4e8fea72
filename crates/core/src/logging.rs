//! Subscriber setup for binaries embedding the service.
//!
//! The library itself only emits `tracing` events; nothing is recorded until a
//! binary installs a subscriber through [`init_logging`].

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the filter directives (`RUST_LOG` syntax).
pub const LOG_ENV: &str = "LOCUS_LOG";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Mirror events to stderr in addition to the log file.
    pub to_stderr: bool,
    /// Filter used when `LOCUS_LOG` is unset or invalid.
    pub default_filter: String,
    /// Overrides the `~/.locus/logs` directory.
    pub dir: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            to_stderr: false,
            default_filter: "info".to_string(),
            dir: None,
        }
    }
}

/// Directory that receives the rolling log files.
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".locus")
        .join("logs")
}

/// Install the global subscriber. Keep the returned guard alive until exit so the
/// non-blocking writer flushes.
pub fn init_logging(component: &str, options: &LogOptions) -> WorkerGuard {
    let log_dir = options.dir.clone().unwrap_or_else(default_log_dir);
    let _ = std::fs::create_dir_all(&log_dir);

    // One file per component and day: cli.log.2024-01-21
    let file_appender = tracing_appender::rolling::daily(&log_dir, format!("{component}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if options.to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    guard
}
