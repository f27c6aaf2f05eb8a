//! Logger initialization for the host process.
//!
//! Stdout carries the framed protocol, so log output only ever goes to the
//! configured file and, optionally, stderr.

use std::fs::{File, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use super::config::HostConfig;

pub(crate) fn initialize(config: &HostConfig) {
    let level = LevelFilter::from(config.log_level);
    if level == LevelFilter::Off {
        return;
    }

    let log_config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if let Some(file_logger) = create_file_logger(&config.log_file, level, log_config.clone()) {
        loggers.push(file_logger);
    }
    if config.log_to_stderr {
        loggers.push(TermLogger::new(
            level,
            log_config,
            TerminalMode::Stderr,
            ColorChoice::Never,
        ));
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    // The browser starts a fresh process per connection; keep earlier runs.
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not open log file at {:?}: {}", path, err);
            None
        }
    }
}
