//! Log retention sweep.
//!
//! Deletes rotated log files older than the retention window. Only files
//! whose names match a known pattern are touched, so unrelated files in a
//! shared log directory survive.

use std::path::Path;
use std::time::{Duration, SystemTime};

use kiosk_common::PlatformError;
use regex::Regex;
use tracing::{debug, warn};

/// File names produced by the daily rolling appenders of both binaries.
pub const DEFAULT_PATTERNS: &[&str] = &[r"^supervisor\..*\.log$", r"^worker-\d+\..*\.log$"];

/// Which files to delete, and after how long.
#[derive(Debug, Clone)]
pub struct SweepPolicy {
    patterns: Vec<Regex>,
    retention: Duration,
}

impl SweepPolicy {
    /// Policy with [`DEFAULT_PATTERNS`].
    pub fn new(retention: Duration) -> Self {
        Self {
            patterns: DEFAULT_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
            retention,
        }
    }

    #[cfg(test)]
    fn with_patterns(retention: Duration, patterns: &[&str]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            retention,
        })
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(file_name))
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    fn is_expired(&self, modified: SystemTime, now: SystemTime) -> bool {
        now.duration_since(modified)
            .map(|age| age > self.retention)
            .unwrap_or(false)
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Files whose names matched a pattern.
    pub matched: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Sweep `dir` once, as of `now`.
///
/// A missing directory is not an error. Per-file failures are logged and
/// counted; they never abort the sweep.
pub fn sweep_logs(
    dir: &Path,
    policy: &SweepPolicy,
    now: SystemTime,
) -> Result<SweepReport, PlatformError> {
    let mut report = SweepReport::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Log directory does not exist, nothing to sweep");
            return Ok(report);
        }
        Err(e) => {
            return Err(PlatformError::PathError(format!(
                "failed to read log directory {}: {e}",
                dir.display()
            )))
        }
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !policy.matches(name) {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| {
            if m.is_file() {
                m.modified()
            } else {
                Err(std::io::Error::other("not a regular file"))
            }
        }) {
            Ok(modified) => modified,
            Err(e) => {
                debug!(file = name, error = %e, "Skipping log entry");
                continue;
            }
        };
        report.matched += 1;

        if !policy.is_expired(modified, now) {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                debug!(file = name, "Deleted expired log file");
                report.deleted += 1;
            }
            Err(e) => {
                warn!(file = name, error = %e, "Failed to delete expired log file");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
