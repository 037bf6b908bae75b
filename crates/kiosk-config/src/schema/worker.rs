use serde::{Deserialize, Serialize};

/// One kiosk surface: the page a worker shows on one display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Zero-based index of the display the worker covers.
    pub monitor_index: u32,
    /// Startup address. Also the "Home" target of the refresh prompt.
    pub url: String,
    /// Whether the exit control may be shown at all.
    pub allow_exit: bool,
    /// Address on which the exit control appears. Blank means `url`.
    pub exit_url: String,
    /// Forward page console output into the worker log.
    pub log_console_messages: bool,
    /// Open the engine's developer tools once the page is up.
    pub dev_tools_on_start: bool,
    /// Entries written to `localStorage` before any page script runs.
    pub local_storage: serde_json::Map<String, serde_json::Value>,
}

impl WorkerConfig {
    /// A worker with defaults for everything but display and address.
    pub fn new(monitor_index: u32, url: impl Into<String>) -> Self {
        Self {
            monitor_index,
            url: url.into(),
            ..Default::default()
        }
    }

    /// Replace a blank or whitespace-only `exit_url` with `url`.
    pub fn resolve_exit_url(&mut self) {
        if self.exit_url.trim().is_empty() {
            self.exit_url = self.url.clone();
        }
    }

    /// The exit destination, falling back to `url` when blank.
    pub fn effective_exit_url(&self) -> &str {
        if self.exit_url.trim().is_empty() {
            &self.url
        } else {
            &self.exit_url
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            monitor_index: 0,
            url: String::new(),
            allow_exit: false,
            exit_url: String::new(),
            log_console_messages: false,
            dev_tools_on_start: false,
            local_storage: serde_json::Map::new(),
        }
    }
}
