use std::path::{Path, PathBuf};

use kiosk_common::PlatformError;

pub(super) const APP_NAME: &str = "kiosk";

/// Returns the platform-specific configuration directory for the kiosk.
///
/// - Linux: `$XDG_CONFIG_HOME/kiosk` (defaults to `~/.config/kiosk`)
/// - Windows: `%APPDATA%\kiosk`
pub fn config_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::config_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine config directory".into()))?
        .join(APP_NAME))
}

/// Returns the platform-specific data directory for the kiosk.
///
/// - Linux: `$XDG_DATA_HOME/kiosk` (defaults to `~/.local/share/kiosk`)
/// - Windows: `%APPDATA%\kiosk`
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Returns the default log directory, `data_dir()/logs`.
pub fn log_dir() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("logs"))
}

/// Returns the log directory to use: the configured override, or [`log_dir`].
pub fn resolve_log_dir(configured: Option<&Path>) -> Result<PathBuf, PlatformError> {
    match configured {
        Some(dir) => Ok(dir.to_path_buf()),
        None => log_dir(),
    }
}

/// Returns the crash report directory inside a resolved log directory.
pub fn crash_report_dir(log_dir: &Path) -> PathBuf {
    log_dir.join("crash-reports")
}
