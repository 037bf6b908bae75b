//! Validation for the supervisor and logging sections.

use crate::schema::KioskConfig;

use super::helpers::validate_range;

/// Validate supervisor constraints.
pub(crate) fn validate_supervisor(errors: &mut Vec<String>, config: &KioskConfig) {
    validate_range(
        errors,
        "supervisor.restart_delay_ms",
        config.supervisor.restart_delay_ms,
        100,
        600_000,
    );
    validate_range(
        errors,
        "supervisor.shutdown_grace_ms",
        config.supervisor.shutdown_grace_ms,
        100,
        60_000,
    );
}

/// Validate logging constraints.
pub(crate) fn validate_logging(errors: &mut Vec<String>, config: &KioskConfig) {
    validate_range(
        errors,
        "logging.retention_days",
        u64::from(config.logging.retention_days),
        1,
        365,
    );
    validate_range(
        errors,
        "logging.sweep_interval_hours",
        u64::from(config.logging.sweep_interval_hours),
        0,
        24 * 30,
    );
}
