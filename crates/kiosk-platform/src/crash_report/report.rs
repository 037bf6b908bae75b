use std::backtrace::Backtrace;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

use crate::paths::crash_report_dir;

/// Writes a crash report for `role` (`supervisor`, `worker-0`, ...) into
/// `<log_dir>/crash-reports` when a panic occurs.
///
/// Returns the path to the written report, or `None` if writing failed.
/// Runs inside a panic hook, so every error is swallowed.
pub fn write_crash_report(info: &PanicHookInfo, role: &str, log_dir: &Path) -> Option<PathBuf> {
    let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };

    let location = info
        .location()
        .map(|loc| (loc.file().to_string(), loc.line(), loc.column()));

    let report = build_crash_report(
        role,
        &message,
        location,
        &Backtrace::force_capture().to_string(),
    );

    save_report(&report, role, log_dir)
}

fn save_report(report: &serde_json::Value, role: &str, log_dir: &Path) -> Option<PathBuf> {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let dir = crash_report_dir(log_dir);
    let path = dir.join(format!("crash_{role}_{timestamp}.json"));

    let _ = std::fs::create_dir_all(&dir);
    std::fs::write(&path, serde_json::to_string_pretty(report).ok()?).ok()?;
    Some(path)
}

/// The JSON document written by [`write_crash_report`].
pub fn build_crash_report(
    role: &str,
    message: &str,
    location: Option<(String, u32, u32)>,
    backtrace: &str,
) -> serde_json::Value {
    let location = location.map(|(file, line, column)| {
        serde_json::json!({
            "file": file,
            "line": line,
            "column": column,
        })
    });

    serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "role": role,
        "pid": std::process::id(),
        "os": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "panic_message": message,
        "location": location,
        "backtrace": backtrace,
    })
}
