//! Process-wide tracing setup shared by the supervisor and the workers.
//!
//! Console output always; a daily rolling file per role when file logging
//! is on. File names are `<role>.<date>.log`, which is what the retention
//! sweep matches.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kiosk_common::PlatformError;

/// Filter used when neither the command line nor the config gives one.
pub const DEFAULT_DIRECTIVE: &str = "kiosk=info";

/// Keeps the file writer flushing until the process exits.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where and how one process logs.
#[derive(Debug, Clone)]
pub struct LogTarget<'a> {
    /// `supervisor` or `worker-<monitor>`; the file name prefix.
    pub role: &'a str,
    /// An `EnvFilter` directive such as `kiosk=debug`.
    pub directive: &'a str,
    /// Directory for the rolling file, or `None` for console only.
    pub file_dir: Option<&'a Path>,
}

impl LogTarget<'_> {
    fn filter(&self) -> EnvFilter {
        let directive = self
            .directive
            .parse::<Directive>()
            .or_else(|_| DEFAULT_DIRECTIVE.parse::<Directive>());
        match directive {
            Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
            Err(_) => EnvFilter::from_default_env(),
        }
    }
}

/// Install the global subscriber. Returns the log directory when a file
/// layer was installed.
///
/// A file layer that cannot be created is reported and skipped; console
/// logging still comes up.
pub fn init_logging(target: &LogTarget<'_>) -> Result<Option<PathBuf>, PlatformError> {
    let (file_layer, file_error) = match target.file_dir {
        Some(dir) => match file_writer(dir, target.role) {
            Ok(writer) => (Some(fmt::layer().with_writer(writer).with_ansi(false)), None),
            Err(e) => (None, Some(e)),
        },
        None => (None, None),
    };
    let file_dir = file_layer.as_ref().and(target.file_dir).map(Path::to_path_buf);

    tracing_subscriber::registry()
        .with(target.filter())
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .map_err(|e| PlatformError::ProcessError(format!("logging already initialized: {e}")))?;

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "file logging disabled");
    }
    Ok(file_dir)
}

fn file_writer(
    dir: &Path,
    role: &str,
) -> Result<tracing_appender::non_blocking::NonBlocking, PlatformError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        PlatformError::PathError(format!("cannot create {}: {e}", dir.display()))
    })?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(role)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| PlatformError::PathError(format!("cannot open log file: {e}")))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_GUARD.set(guard);
    Ok(writer)
}
