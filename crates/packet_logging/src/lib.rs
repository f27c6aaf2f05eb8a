#![deny(missing_docs)]
//! Shared logging utilities for the job packet workspace.
//!
//! This crate provides the `packet_*` logging macros used across the codebase,
//! a minimal test initializer for the global logger, and the append-only
//! error log that survives even when no logger was configured.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[doc(hidden)]
pub use log;

/// File name of the process-wide error log inside the system temp directory.
pub const ERROR_LOG_FILENAME: &str = "job_packet_host_error.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! packet_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! packet_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! packet_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! packet_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! packet_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Default location of the error log: `<temp dir>/job_packet_host_error.log`.
pub fn default_error_log_path() -> PathBuf {
    std::env::temp_dir().join(ERROR_LOG_FILENAME)
}

/// Appends one timestamped line to the error log at `path`.
///
/// The file is opened, appended to and closed on every call; no handle is
/// kept between calls. Any failure is swallowed.
pub fn append_error_log(path: &Path, message: &str) {
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let entry = format!("[{stamp}] ERROR: {message}\n");
    let _ = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(entry.as_bytes()));
}

/// Initializes a simple stderr logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn error_log_appends_one_line_per_call() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("errors.log");

        append_error_log(&path, "first failure");
        append_error_log(&path, "second failure");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("ERROR: first failure"));
        assert!(lines[1].ends_with("ERROR: second failure"));
    }

    #[test]
    fn error_log_failures_are_swallowed() {
        let temp = TempDir::new().unwrap();
        // A directory cannot be opened for appending.
        append_error_log(temp.path(), "goes nowhere");
        assert!(temp.path().is_dir());
    }
}
