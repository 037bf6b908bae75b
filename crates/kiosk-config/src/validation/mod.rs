//! Full configuration validation.
//!
//! Validates numeric ranges and the worker list. Each domain has its own
//! submodule; this orchestrator calls them all and collects errors into a
//! single `ConfigError`.

mod helpers;
mod settings;
mod workers;


use crate::schema::KioskConfig;
use kiosk_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &KioskConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    settings::validate_supervisor(&mut errors, config);
    settings::validate_logging(&mut errors, config);
    workers::validate_workers(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
