//! Validation for the `[[workers]]` list.

use std::collections::HashSet;

use crate::schema::KioskConfig;

use super::helpers::validate_absolute_url;

/// Validate every worker entry and the list as a whole.
///
/// Two entries for one display would mean two live workers on one
/// surface, so duplicate monitor indices are rejected.
pub(crate) fn validate_workers(errors: &mut Vec<String>, config: &KioskConfig) {
    let mut seen = HashSet::new();

    for (i, worker) in config.workers.iter().enumerate() {
        validate_absolute_url(errors, &format!("workers[{i}].url"), &worker.url);

        if !worker.exit_url.trim().is_empty() {
            validate_absolute_url(errors, &format!("workers[{i}].exit_url"), &worker.exit_url);
        }

        if !seen.insert(worker.monitor_index) {
            errors.push(format!(
                "workers[{i}].monitor_index = {} is used by more than one worker",
                worker.monitor_index
            ));
        }
    }
}
