//! Core TOML config loading: read from path or platform default.

use crate::schema::KioskConfig;
use kiosk_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// No normalization or validation happens here; see [`crate::load_config`].
pub fn load_from_path(path: &Path) -> Result<KioskConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: KioskConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!(
        workers = config.workers.len(),
        "loaded config from {}",
        path.display()
    );
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Windows: `%APPDATA%\kiosk\kiosk.toml`
/// On Linux: `~/.config/kiosk/kiosk.toml`
///
/// If the file does not exist, creates a commented default file and returns defaults.
pub fn load_default() -> Result<KioskConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(KioskConfig::default())
        }
        Err(e) => Err(e),
    }
}
