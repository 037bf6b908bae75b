pub mod binary;
pub mod crash_report;
pub mod log_retention;
pub mod logging;
pub mod paths;
pub mod process;

pub use binary::{resolve_worker_binary, worker_binary_name, WORKER_BINARY};
pub use log_retention::{sweep_logs, SweepPolicy, SweepReport};
pub use logging::{init_logging, LogTarget, DEFAULT_DIRECTIVE};
pub use paths::{config_dir, crash_report_dir, data_dir, ensure_dirs, log_dir, resolve_log_dir};
