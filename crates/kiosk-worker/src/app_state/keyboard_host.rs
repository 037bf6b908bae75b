//! Keyboard helpers as plain processes.
//!
//! Window lookup is approximated by process lookup: a running helper counts
//! as a visible window, and no window can be restored, so the fallback
//! always terminates and relaunches.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use kiosk_platform::process;
use kiosk_session::KeyboardHost;

#[derive(Default)]
pub struct ProcessKeyboardHost {
    /// Helpers we started, kept so exited ones get reaped.
    children: Vec<Child>,
}

impl ProcessKeyboardHost {
    fn reap(&mut self) {
        self.children.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

fn process_name(program: &Path) -> &OsStr {
    program.file_name().unwrap_or(program.as_os_str())
}

impl KeyboardHost for ProcessKeyboardHost {
    fn launch(&mut self, program: &Path) -> io::Result<()> {
        self.reap();
        if !program.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", program.display()),
            ));
        }
        let child = Command::new(program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        tracing::debug!(pid = child.id(), path = %program.display(), "keyboard helper spawned");
        self.children.push(child);
        Ok(())
    }

    fn has_visible_window(&mut self, program: &Path) -> bool {
        process::is_running(process_name(program))
    }

    fn restore_window(&mut self, _program: &Path) -> bool {
        false
    }

    fn terminate(&mut self, program: &Path) -> usize {
        self.reap();
        process::terminate_by_name(process_name(program), &[])
    }
}
