mod report;

pub use report::{build_crash_report, write_crash_report};
