//! Worker executable lookup.

use std::path::{Path, PathBuf};

use kiosk_common::PlatformError;
use tracing::{debug, warn};

/// File stem of the worker executable.
pub const WORKER_BINARY: &str = "kiosk-worker";

/// Worker executable file name for the current platform.
pub fn worker_binary_name() -> String {
    format!("{WORKER_BINARY}{}", std::env::consts::EXE_SUFFIX)
}

/// Locate the worker executable.
///
/// Tries the configured override first, then, in order:
/// 1. next to the running executable
/// 2. `bin/` below the running executable's directory
/// 3. the current working directory
pub fn resolve_worker_binary(configured: Option<&Path>) -> Result<PathBuf, PlatformError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().ok();
    resolve_from(configured, exe_dir.as_deref(), cwd.as_deref())
}

fn resolve_from(
    configured: Option<&Path>,
    exe_dir: Option<&Path>,
    cwd: Option<&Path>,
) -> Result<PathBuf, PlatformError> {
    let mut searched = Vec::new();

    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        warn!(path = %path.display(), "Configured worker binary not found, trying fallbacks");
        searched.push(path.to_path_buf());
    }

    for candidate in fallback_candidates(exe_dir, cwd) {
        debug!(path = %candidate.display(), "Probing for worker binary");
        if candidate.is_file() {
            return Ok(candidate);
        }
        searched.push(candidate);
    }

    let searched = searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(PlatformError::PathError(format!(
        "worker binary {} not found (searched: {searched})",
        worker_binary_name()
    )))
}

fn fallback_candidates(exe_dir: Option<&Path>, cwd: Option<&Path>) -> Vec<PathBuf> {
    let name = worker_binary_name();
    let mut candidates = Vec::new();
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(&name));
        candidates.push(dir.join("bin").join(&name));
    }
    if let Some(dir) = cwd {
        candidates.push(dir.join(&name));
    }
    candidates
}
