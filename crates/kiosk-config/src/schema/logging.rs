use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration, shared by the supervisor and every worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Log directory override. Defaults to the platform log directory.
    pub directory: Option<PathBuf>,
    pub file_logging: bool,
    /// Age after which rotated log files are deleted (valid range: 1-365).
    pub retention_days: u32,
    /// How often the retention sweep re-runs. 0 sweeps once at startup.
    pub sweep_interval_hours: u32,
}

impl LoggingConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.retention_days) * 24 * 60 * 60)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        match self.sweep_interval_hours {
            0 => None,
            hours => Some(Duration::from_secs(u64::from(hours) * 60 * 60)),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            directory: None,
            file_logging: true,
            retention_days: 7,
            sweep_interval_hours: 24,
        }
    }
}
