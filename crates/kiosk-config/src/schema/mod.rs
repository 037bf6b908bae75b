//! Configuration schema types for the kiosk fleet.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults documented on each field.

mod keyboard;
mod logging;
mod supervisor;
mod worker;

pub use keyboard::*;
pub use logging::*;
pub use supervisor::*;
pub use worker::*;

use serde::{Deserialize, Serialize};

/// Root configuration shared by the supervisor and the workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct KioskConfig {
    pub supervisor: SupervisorConfig,
    pub logging: LoggingConfig,
    pub keyboard: KeyboardConfig,
    pub workers: Vec<WorkerConfig>,
}

impl KioskConfig {
    /// Resolve derived fields. Must run once after deserialization and
    /// before the config is handed to anything else.
    pub fn normalize(&mut self) {
        for worker in &mut self.workers {
            worker.resolve_exit_url();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_workers() {
        let config = KioskConfig::default();
        assert!(config.workers.is_empty());
    }

    #[test]
    fn default_supervisor_settings() {
        let config = KioskConfig::default();
        assert_eq!(config.supervisor.restart_delay_ms, 5000);
        assert_eq!(config.supervisor.shutdown_grace_ms, 3000);
        assert!(config.supervisor.worker_binary.is_none());
        assert!(!config.supervisor.kill_strays_by_name);
    }

    #[test]
    fn default_logging_settings() {
        let config = KioskConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.file_logging);
        assert_eq!(config.logging.retention_days, 7);
        assert_eq!(config.logging.sweep_interval_hours, 24);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn default_keyboard_has_primary_and_secondary() {
        let config = KioskConfig::default();
        assert!(!config.keyboard.primary.is_empty());
        assert!(!config.keyboard.secondary.as_os_str().is_empty());
    }

    #[test]
    fn normalize_fills_blank_exit_urls() {
        let mut config = KioskConfig::default();
        config
            .workers
            .push(WorkerConfig::new(0, "https://a.example/"));
        let mut second = WorkerConfig::new(1, "https://b.example/start");
        second.exit_url = "https://b.example/home".into();
        config.workers.push(second);

        config.normalize();

        assert_eq!(config.workers[0].exit_url, "https://a.example/");
        assert_eq!(config.workers[1].exit_url, "https://b.example/home");
    }

    #[test]
    fn deserializes_worker_list_from_toml() {
        let config: KioskConfig = toml::from_str(
            r#"
[[workers]]
monitor_index = 0
url = "https://a.example/"
allow_exit = true

[[workers]]
monitor_index = 1
url = "https://b.example/"
log_console_messages = true
"#,
        )
        .unwrap();

        assert_eq!(config.workers.len(), 2);
        assert!(config.workers[0].allow_exit);
        assert!(config.workers[1].log_console_messages);
        assert_eq!(config.supervisor.restart_delay_ms, 5000);
    }
}
