//! The positional argument contract between supervisor and worker.
//!
//! Order is significant:
//!
//! ```text
//! monitorIndex url allowExit exitUrl logConsoleMessages localStorageJson devTools
//! ```
//!
//! Arguments travel as an argv vector, so they need no quoting. The
//! [`command_line`] rendering exists for logs and for people who want to
//! start a worker by hand from a shell.

use crate::schema::WorkerConfig;

/// Number of positional arguments a worker expects.
pub const WORKER_ARG_COUNT: usize = 7;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("expected {WORKER_ARG_COUNT} positional arguments, got {0}")]
    Count(usize),

    #[error("monitor index {0:?} is missing, negative, or not a number")]
    MonitorIndex(String),

    #[error("{name} must be true or false, got {value:?}")]
    Flag { name: &'static str, value: String },
}

/// Build the worker's positional arguments from its config.
///
/// The exit URL is always sent resolved, and the localStorage seed is sent
/// as single-line JSON (`{}` when empty).
pub fn to_args(worker: &WorkerConfig) -> Vec<String> {
    let seed = serde_json::to_string(&worker.local_storage).unwrap_or_else(|_| "{}".into());
    vec![
        worker.monitor_index.to_string(),
        worker.url.clone(),
        worker.allow_exit.to_string(),
        worker.effective_exit_url().to_string(),
        worker.log_console_messages.to_string(),
        seed,
        worker.dev_tools_on_start.to_string(),
    ]
}

/// Render the argument list as one line, the way a host shell needs it:
/// every argument double-quoted and embedded double quotes escaped.
pub fn command_line(worker: &WorkerConfig) -> String {
    to_args(worker)
        .iter()
        .map(|arg| format!("\"{}\"", arg.replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a boolean flag argument. Accepts `true`/`false`, `1`/`0` and
/// `yes`/`no` in any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a monitor index. Rejects blanks, negatives, and non-numbers.
pub fn parse_monitor_index(value: &str) -> Result<u32, ArgsError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ArgsError::MonitorIndex(value.to_string()))
}

/// Rebuild a worker config from positional arguments.
///
/// The localStorage payload is returned as-is: decoding it is the content
/// seeder's job, and a bad payload must not reject the whole contract.
pub fn from_args(args: &[String]) -> Result<(WorkerConfig, String), ArgsError> {
    if args.len() < WORKER_ARG_COUNT {
        return Err(ArgsError::Count(args.len()));
    }

    let flag = |name: &'static str, value: &str| {
        parse_flag(value).ok_or_else(|| ArgsError::Flag {
            name,
            value: value.to_string(),
        })
    };

    let mut worker = WorkerConfig {
        monitor_index: parse_monitor_index(&args[0])?,
        url: args[1].clone(),
        allow_exit: flag("allowExit", &args[2])?,
        exit_url: args[3].clone(),
        log_console_messages: flag("logConsoleMessages", &args[4])?,
        dev_tools_on_start: flag("devTools", &args[6])?,
        local_storage: serde_json::Map::new(),
    };
    worker.resolve_exit_url();

    Ok((worker, args[5].clone()))
}
