use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use packet_engine::MAX_MESSAGE_BYTES;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub(crate) const CONFIG_ENV: &str = "JOB_PACKET_HOST_CONFIG";
const CONFIG_FILENAME: &str = "job_packet_host.ron";
const LOG_FILENAME: &str = "job_packet_host.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HostConfig {
    pub(crate) log_level: LogLevel,
    pub(crate) log_file: PathBuf,
    pub(crate) log_to_stderr: bool,
    pub(crate) error_log: PathBuf,
    pub(crate) max_message_bytes: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_file: std::env::temp_dir().join(LOG_FILENAME),
            log_to_stderr: false,
            error_log: packet_logging::default_error_log_path(),
            max_message_bytes: MAX_MESSAGE_BYTES,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// `$JOB_PACKET_HOST_CONFIG`, else `job_packet_host.ron` beside the executable.
pub(crate) fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(CONFIG_FILENAME))
}

/// Reads the config at `path`. A missing file is `Ok(None)`.
pub(crate) fn load_config(path: &Path) -> Result<Option<HostConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut config: HostConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.max_message_bytes = config.max_message_bytes.min(MAX_MESSAGE_BYTES);
    Ok(Some(config))
}

/// Loads the config from its usual location, falling back to defaults.
///
/// The logger is not up yet, so a load failure is handed back as a warning
/// for the caller to log once it is.
pub(crate) fn load_or_default() -> (HostConfig, Option<String>) {
    let Some(path) = config_path() else {
        return (HostConfig::default(), None);
    };
    match load_config(&path) {
        Ok(Some(config)) => (config, None),
        Ok(None) => (HostConfig::default(), None),
        Err(err) => (
            HostConfig::default(),
            Some(format!("{err}; using default settings")),
        ),
    }
}
