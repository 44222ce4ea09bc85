//! Logging infrastructure for MD Analyzer.
//!
//! Thin wrappers over the `tracing` ecosystem: a stderr subscriber that
//! honors `RUST_LOG`, plus an optional non-blocking daily log file under
//! the configured logs folder. Called once at application startup.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace-level debugging (very verbose).
    Trace,
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl LogLevel {
    /// Convert to a tracing level.
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Initialize global tracing subscriber for application-wide logging.
///
/// Respects the RUST_LOG environment variable, falling back to the
/// provided default level, and writes to stderr.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing with both stderr output and a daily log file.
///
/// The returned guard must be kept alive for the lifetime of the
/// application or buffered log lines are dropped.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(logs_dir, "md-analyzer.log");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(env_filter(default_level))
        .init();

    guard
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)))
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_filter_works() {
        assert_eq!(level_to_filter_str(LogLevel::Debug), "debug");
        assert_eq!(level_to_filter_str(LogLevel::Info), "info");
    }

    #[test]
    fn level_maps_to_tracing() {
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn level_serializes_lowercase() {
        #[derive(Serialize)]
        struct Wrap {
            level: LogLevel,
        }
        let text = toml::to_string(&Wrap {
            level: LogLevel::Debug,
        })
        .unwrap();
        assert!(text.contains("debug"));
    }
}
