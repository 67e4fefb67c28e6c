//! Logging infrastructure for Simple Video Editor.
//!
//! This module provides:
//! - Application-wide `tracing` setup (stderr, plus a rolling file)
//! - Per-export loggers with file + GUI callback output
//! - A tail buffer of FFmpeg output for error reports
//!
//! # Example
//!
//! ```no_run
//! use sve_core::logging::{ExportLogger, LogConfig};
//!
//! let logger = ExportLogger::new("export_1", "/path/to/logs", LogConfig::default(), None).unwrap();
//! logger.phase("Loading video clips");
//! logger.command("ffprobe -show_streams clip.mp4");
//! logger.success("Export finished");
//! ```

mod export_logger;
mod types;

pub use export_logger::ExportLogger;
pub use types::{LineCallback, LogConfig, LogLevel, MessagePrefix};

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// Respects RUST_LOG and falls back to `default_level`. Output goes to
/// stderr with timestamps. Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing to stderr and a daily-rolling file in `logs_dir`.
///
/// The returned guard flushes the file writer when dropped, so keep it
/// alive for the lifetime of the application.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(logs_dir, "simple-video-editor.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

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
}
