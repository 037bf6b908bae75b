use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Process supervisor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Fixed delay before a crashed worker is relaunched (valid range: 100-600000).
    pub restart_delay_ms: u64,
    /// Explicit path to the worker executable. When unset, a fixed list of
    /// locations next to the supervisor is searched.
    pub worker_binary: Option<PathBuf>,
    /// How long workers get to exit after a shutdown request (valid range: 100-60000).
    pub shutdown_grace_ms: u64,
    /// Also terminate any process named like the worker binary on manual exit.
    pub kill_strays_by_name: bool,
}

impl SupervisorConfig {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: 5000,
            worker_binary: None,
            shutdown_grace_ms: 3000,
            kill_strays_by_name: false,
        }
    }
}
