//! Starting worker processes.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use kiosk_config::{worker_args, WorkerConfig, CONFIG_ENV_VAR};

/// A running worker, owned by exactly one supervising task.
#[async_trait]
pub trait WorkerProcess: Send {
    fn id(&self) -> Option<u32>;

    /// Wait for the process to end. `None` means it had no exit code
    /// (killed by a signal).
    async fn wait(&mut self) -> io::Result<Option<i32>>;

    /// Kill the process and reap it.
    async fn kill(&mut self) -> io::Result<()>;
}

pub trait WorkerLauncher: Send + Sync {
    fn launch(&self, worker: &WorkerConfig) -> io::Result<Box<dyn WorkerProcess>>;
}

/// Launches the real worker binary.
pub struct ProcessLauncher {
    binary: PathBuf,
    config_path: Option<PathBuf>,
}

impl ProcessLauncher {
    /// `config_path`, when set, is passed on through the environment so the
    /// workers read the same file.
    pub fn new(binary: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            binary,
            config_path,
        }
    }

    fn command(&self, worker: &WorkerConfig) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(worker_args::to_args(worker))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = self.binary.parent() {
            cmd.current_dir(dir);
        }
        if let Some(path) = &self.config_path {
            cmd.env(CONFIG_ENV_VAR, path);
        }
        cmd
    }
}

impl WorkerLauncher for ProcessLauncher {
    fn launch(&self, worker: &WorkerConfig) -> io::Result<Box<dyn WorkerProcess>> {
        tracing::info!(
            monitor = worker.monitor_index,
            command = %format!("\"{}\" {}", self.binary.display(), worker_args::command_line(worker)),
            "launching worker"
        );
        let child = self.command(worker).spawn()?;
        Ok(Box::new(ChildProcess { child }))
    }
}

struct ChildProcess {
    child: Child,
}

#[async_trait]
impl WorkerProcess for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(&mut self) -> io::Result<Option<i32>> {
        Ok(self.child.wait().await?.code())
    }

    async fn kill(&mut self) -> io::Result<()> {
        self.child.kill().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_runs_from_binary_directory() {
        let launcher = ProcessLauncher::new(PathBuf::from("/opt/kiosk/kiosk-worker"), None);
        let cmd = launcher.command(&WorkerConfig::new(1, "https://a/"));
        let std = cmd.as_std();
        assert_eq!(std.get_current_dir(), Some(std::path::Path::new("/opt/kiosk")));
        assert_eq!(std.get_args().count(), kiosk_config::WORKER_ARG_COUNT);
        assert!(std.get_envs().all(|(k, _)| k != CONFIG_ENV_VAR));
    }

    #[test]
    fn config_path_is_forwarded() {
        let launcher = ProcessLauncher::new(
            PathBuf::from("/opt/kiosk/kiosk-worker"),
            Some(PathBuf::from("/etc/kiosk.toml")),
        );
        let cmd = launcher.command(&WorkerConfig::new(0, "https://a/"));
        let env: Vec<_> = cmd.as_std().get_envs().collect();
        assert_eq!(
            env,
            [(
                std::ffi::OsStr::new(CONFIG_ENV_VAR),
                Some(std::ffi::OsStr::new("/etc/kiosk.toml"))
            )]
        );
    }

    #[tokio::test]
    async fn missing_binary_fails_to_launch() {
        let dir = std::env::temp_dir().join("kiosk-no-such-dir-5c1e");
        let launcher = ProcessLauncher::new(dir.join("kiosk-worker"), None);
        assert!(launcher.launch(&WorkerConfig::new(0, "https://a/")).is_err());
    }
}
