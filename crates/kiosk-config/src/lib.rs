//! Kiosk configuration system.
//!
//! Provides TOML-based configuration for the supervisor and its workers.
//! All sections use sensible defaults so partial configs work out of the box;
//! only the `[[workers]]` list has to be written by hand.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kiosk_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! for worker in &config.workers {
//!     println!("display {} -> {}", worker.monitor_index, worker.url);
//! }
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;
pub mod worker_args;

pub use schema::{
    KeyboardConfig, KioskConfig, LogLevel, LoggingConfig, SupervisorConfig, WorkerConfig,
};
pub use worker_args::{parse_flag, ArgsError, WORKER_ARG_COUNT};

use kiosk_common::ConfigError;

/// Environment variable that overrides the config file location.
///
/// The supervisor sets it for every worker when started with `--config`,
/// so both sides read the same file.
pub const CONFIG_ENV_VAR: &str = "KIOSK_CONFIG";

/// Load config from `KIOSK_CONFIG` if set, otherwise from the platform
/// default path (creating a commented default file on first run).
///
/// The result is normalized (blank exit URLs resolved) and validated.
pub fn load_config() -> Result<KioskConfig, ConfigError> {
    let mut config = match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => toml_loader::load_from_path(path.as_ref())?,
        _ => toml_loader::load_default()?,
    };
    config.normalize();
    validation::validate(&config)?;
    Ok(config)
}

/// Load, normalize, and validate config from an explicit path.
pub fn load_config_from(path: &std::path::Path) -> Result<KioskConfig, ConfigError> {
    let mut config = toml_loader::load_from_path(path)?;
    config.normalize();
    validation::validate(&config)?;
    Ok(config)
}
