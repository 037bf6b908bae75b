//! Process lookup and termination by executable name.
//!
//! Name matching can hit unrelated processes that share the name, so
//! callers use this only as a best-effort sweep on top of handle-based
//! termination.

use std::ffi::OsStr;

use sysinfo::{ProcessesToUpdate, System};
use tracing::{debug, warn};

fn snapshot() -> System {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);
    system
}

/// PIDs of all running processes whose name is exactly `name`.
pub fn find_by_name(name: &OsStr) -> Vec<u32> {
    snapshot()
        .processes_by_exact_name(name)
        .map(|p| p.pid().as_u32())
        .collect()
}

/// Whether any process named `name` is running.
pub fn is_running(name: &OsStr) -> bool {
    !find_by_name(name).is_empty()
}

/// Ask every process named `name` to terminate, skipping `exclude` and the
/// calling process. Returns how many accepted the request; processes that
/// refuse are logged and ignored.
pub fn terminate_by_name(name: &OsStr, exclude: &[u32]) -> usize {
    let own = sysinfo::get_current_pid().ok();
    let system = snapshot();
    let mut terminated = 0;

    for process in system.processes_by_exact_name(name) {
        let pid = process.pid();
        if Some(pid) == own || exclude.contains(&pid.as_u32()) {
            continue;
        }
        if process.kill() {
            debug!(pid = pid.as_u32(), name = ?name, "Terminated process by name");
            terminated += 1;
        } else {
            warn!(pid = pid.as_u32(), name = ?name, "Process refused to terminate, ignoring");
        }
    }

    terminated
}
