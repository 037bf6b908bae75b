use std::fs;
use std::path::Path;

use kiosk_common::PlatformError;

use super::resolve::{config_dir, crash_report_dir};

/// Creates the config, log, and crash report directories if missing.
pub fn ensure_dirs(log_dir: &Path) -> Result<(), PlatformError> {
    fs::create_dir_all(config_dir()?).map_err(|e| PlatformError::PathError(e.to_string()))?;
    fs::create_dir_all(log_dir).map_err(|e| PlatformError::PathError(e.to_string()))?;
    fs::create_dir_all(crash_report_dir(log_dir)).map_err(|e| PlatformError::PathError(e.to_string()))?;
    Ok(())
}
