//! One supervising task per worker, plus the coordinator that owns them.
//!
//! A worker that exits with code 0 was closed on purpose: every other
//! worker is stopped and the supervisor ends. Any other exit (including
//! death by signal) is a crash, and the worker is relaunched after the
//! restart delay.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;

use kiosk_config::{SupervisorConfig, WorkerConfig};

use crate::error::SupervisorError;
use crate::launcher::{WorkerLauncher, WorkerProcess};

/// Extra time given to tasks on top of the kill grace before they are aborted.
const DRAIN_MARGIN: Duration = Duration::from_millis(500);

/// How a single supervising task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEnd {
    ManualExit,
    Shutdown,
}

/// Why the supervisor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorExit {
    /// A worker exited with code 0.
    ManualExit,
    /// Ctrl+C or a termination signal.
    Interrupted,
    /// Every supervising task gave up (or there were none).
    Idle,
}

impl SupervisorExit {
    pub fn code(self) -> std::process::ExitCode {
        match self {
            SupervisorExit::ManualExit => std::process::ExitCode::SUCCESS,
            SupervisorExit::Interrupted | SupervisorExit::Idle => std::process::ExitCode::FAILURE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub restart_delay: Duration,
    pub shutdown_grace: Duration,
    /// Process name swept after shutdown, when stray cleanup is on.
    pub stray_process_name: Option<String>,
}

impl SupervisorSettings {
    pub fn from_config(config: &SupervisorConfig, binary_name: String) -> Self {
        Self {
            restart_delay: config.restart_delay(),
            shutdown_grace: config.shutdown_grace(),
            stray_process_name: config.kill_strays_by_name.then_some(binary_name),
        }
    }
}

/// Keep one worker alive until it exits cleanly or shutdown is signalled.
pub async fn supervise_worker(
    worker: WorkerConfig,
    launcher: Arc<dyn WorkerLauncher>,
    restart_delay: Duration,
    shutdown_grace: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Result<TaskEnd, SupervisorError> {
    let monitor = worker.monitor_index;

    loop {
        if *shutdown.borrow() {
            return Ok(TaskEnd::Shutdown);
        }

        let mut process = launcher
            .launch(&worker)
            .map_err(|source| SupervisorError::Spawn { monitor, source })?;
        tracing::info!(monitor, pid = ?process.id(), "Worker started");

        let status = tokio::select! {
            status = process.wait() => Some(status),
            _ = shutdown.changed() => None,
        };

        let code = match status {
            None => {
                stop(process.as_mut(), monitor, shutdown_grace).await;
                return Ok(TaskEnd::Shutdown);
            }
            Some(Err(source)) => return Err(SupervisorError::Wait { monitor, source }),
            Some(Ok(code)) => code,
        };

        if code == Some(0) {
            tracing::info!(monitor, "Worker exited cleanly, shutting down");
            return Ok(TaskEnd::ManualExit);
        }

        tracing::warn!(
            monitor,
            code = ?code,
            delay_ms = restart_delay.as_millis() as u64,
            "Worker crashed, restarting"
        );

        let interrupted = tokio::select! {
            _ = tokio::time::sleep(restart_delay) => false,
            _ = shutdown.changed() => true,
        };
        if interrupted {
            return Ok(TaskEnd::Shutdown);
        }
    }
}

async fn stop(process: &mut dyn WorkerProcess, monitor: u32, grace: Duration) {
    match tokio::time::timeout(grace, process.kill()).await {
        Ok(Ok(())) => tracing::info!(monitor, "Worker stopped"),
        Ok(Err(e)) => tracing::warn!(monitor, error = %e, "Failed to stop worker"),
        Err(_) => tracing::warn!(
            monitor,
            grace_ms = grace.as_millis() as u64,
            "Worker did not stop in time"
        ),
    }
}

pub struct Supervisor {
    launcher: Arc<dyn WorkerLauncher>,
    settings: SupervisorSettings,
}

impl Supervisor {
    pub fn new(launcher: Arc<dyn WorkerLauncher>, settings: SupervisorSettings) -> Self {
        Self { launcher, settings }
    }

    /// Supervise `workers` until one exits cleanly, `interrupt` resolves, or
    /// every task has ended. All workers are stopped before returning.
    pub async fn run<F>(&self, workers: Vec<WorkerConfig>, interrupt: F) -> SupervisorExit
    where
        F: std::future::Future<Output = ()>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();

        for worker in workers {
            let monitor = worker.monitor_index;
            let task = supervise_worker(
                worker,
                Arc::clone(&self.launcher),
                self.settings.restart_delay,
                self.settings.shutdown_grace,
                shutdown_rx.clone(),
            );
            tasks.spawn(async move { (monitor, task.await) });
        }

        tokio::pin!(interrupt);
        let exit = loop {
            let joined = tokio::select! {
                joined = tasks.join_next() => joined,
                _ = &mut interrupt => {
                    tracing::info!("Interrupted, stopping workers");
                    break SupervisorExit::Interrupted;
                }
            };

            match joined {
                None => {
                    tracing::error!("No worker is being supervised");
                    break SupervisorExit::Idle;
                }
                Some(Ok((_, Ok(TaskEnd::ManualExit)))) => break SupervisorExit::ManualExit,
                Some(Ok((monitor, Ok(TaskEnd::Shutdown)))) => {
                    tracing::debug!(monitor, "Supervising task ended");
                }
                Some(Ok((monitor, Err(e)))) => {
                    tracing::error!(monitor, error = %e, "Giving up on worker");
                }
                Some(Err(e)) => tracing::error!(error = %e, "Supervising task panicked"),
            }
        };

        self.shut_down(shutdown_tx, tasks).await;
        exit
    }

    async fn shut_down(
        &self,
        shutdown_tx: watch::Sender<bool>,
        mut tasks: JoinSet<(u32, Result<TaskEnd, SupervisorError>)>,
    ) {
        let _ = shutdown_tx.send(true);

        let drain = async { while tasks.join_next().await.is_some() {} };
        if tokio::time::timeout(self.settings.shutdown_grace + DRAIN_MARGIN, drain)
            .await
            .is_err()
        {
            tracing::warn!("Supervising tasks did not finish, aborting them");
            tasks.abort_all();
        }

        if let Some(name) = self.settings.stray_process_name.clone() {
            let own = std::process::id();
            let killed = tokio::task::spawn_blocking(move || {
                kiosk_platform::process::terminate_by_name(name.as_ref(), &[own])
            })
            .await
            .unwrap_or(0);
            if killed > 0 {
                tracing::warn!(killed, "Terminated stray worker processes");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Plan {
        Exit { after: Duration, code: Option<i32> },
        Hang,
        SpawnError,
    }

    #[derive(Default)]
    struct FakeLauncher {
        plans: Mutex<HashMap<u32, VecDeque<Plan>>>,
        launches: Mutex<Vec<(u32, Instant)>>,
        kills: Arc<AtomicUsize>,
    }

    impl FakeLauncher {
        fn plan(self, monitor: u32, plans: &[Plan]) -> Self {
            self.plans
                .lock()
                .unwrap()
                .insert(monitor, plans.iter().copied().collect());
            self
        }

        fn launches_of(&self, monitor: u32) -> Vec<Instant> {
            self.launches
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, _)| *m == monitor)
                .map(|(_, at)| *at)
                .collect()
        }

        fn kills(&self) -> usize {
            self.kills.load(Ordering::SeqCst)
        }
    }

    impl WorkerLauncher for FakeLauncher {
        fn launch(&self, worker: &WorkerConfig) -> io::Result<Box<dyn WorkerProcess>> {
            let monitor = worker.monitor_index;
            let plan = self
                .plans
                .lock()
                .unwrap()
                .get_mut(&monitor)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Plan::Hang);
            if let Plan::SpawnError = plan {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no binary"));
            }
            self.launches.lock().unwrap().push((monitor, Instant::now()));
            Ok(Box::new(FakeProcess {
                plan,
                kills: Arc::clone(&self.kills),
            }))
        }
    }

    struct FakeProcess {
        plan: Plan,
        kills: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl WorkerProcess for FakeProcess {
        fn id(&self) -> Option<u32> {
            Some(4242)
        }

        async fn wait(&mut self) -> io::Result<Option<i32>> {
            match self.plan {
                Plan::Exit { after, code } => {
                    tokio::time::sleep(after).await;
                    Ok(code)
                }
                _ => std::future::pending().await,
            }
        }

        async fn kill(&mut self) -> io::Result<()> {
            self.kills.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn crash(code: i32) -> Plan {
        Plan::Exit {
            after: Duration::from_secs(1),
            code: Some(code),
        }
    }

    fn settings() -> SupervisorSettings {
        SupervisorSettings {
            restart_delay: Duration::from_secs(5),
            shutdown_grace: Duration::from_secs(2),
            stray_process_name: None,
        }
    }

    fn workers(monitors: &[u32]) -> Vec<WorkerConfig> {
        monitors
            .iter()
            .map(|m| WorkerConfig::new(*m, "https://kiosk.example/"))
            .collect()
    }

    // -- single worker --

    #[tokio::test(start_paused = true)]
    async fn crashed_worker_restarts_after_delay() {
        let launcher = Arc::new(FakeLauncher::default().plan(0, &[crash(7), crash(7)]));
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(supervise_worker(
            WorkerConfig::new(0, "https://a/"),
            launcher.clone(),
            Duration::from_secs(5),
            Duration::from_secs(2),
            rx,
        ));

        tokio::time::sleep(Duration::from_secs(30)).await;
        tx.send(true).unwrap();
        assert_eq!(task.await.unwrap().unwrap(), TaskEnd::Shutdown);

        let launches = launcher.launches_of(0);
        assert_eq!(launches.len(), 3);
        // one second of runtime plus the five second delay
        assert_eq!(launches[1] - launches[0], Duration::from_secs(6));
        assert_eq!(launches[2] - launches[1], Duration::from_secs(6));
        assert_eq!(launcher.kills(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn killed_by_signal_counts_as_crash() {
        let plan = Plan::Exit {
            after: Duration::from_secs(1),
            code: None,
        };
        let launcher = Arc::new(FakeLauncher::default().plan(0, &[plan]));
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(supervise_worker(
            WorkerConfig::new(0, "https://a/"),
            launcher.clone(),
            Duration::from_secs(5),
            Duration::from_secs(2),
            rx,
        ));

        tokio::time::sleep(Duration::from_secs(10)).await;
        tx.send(true).unwrap();
        task.await.unwrap().unwrap();
        assert_eq!(launcher.launches_of(0).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_during_restart_delay_does_not_relaunch() {
        let launcher = Arc::new(FakeLauncher::default().plan(0, &[crash(3)]));
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(supervise_worker(
            WorkerConfig::new(0, "https://a/"),
            launcher.clone(),
            Duration::from_secs(5),
            Duration::from_secs(2),
            rx,
        ));

        tokio::time::sleep(Duration::from_secs(2)).await;
        tx.send(true).unwrap();
        assert_eq!(task.await.unwrap().unwrap(), TaskEnd::Shutdown);
        assert_eq!(launcher.launches_of(0).len(), 1);
        assert_eq!(launcher.kills(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn spawn_failure_ends_the_task() {
        let launcher = Arc::new(FakeLauncher::default().plan(0, &[Plan::SpawnError]));
        let (_tx, rx) = watch::channel(false);
        let result = supervise_worker(
            WorkerConfig::new(0, "https://a/"),
            launcher,
            Duration::from_secs(5),
            Duration::from_secs(2),
            rx,
        )
        .await;
        assert!(matches!(result, Err(SupervisorError::Spawn { monitor: 0, .. })));
    }

    // -- coordinator --

    #[tokio::test(start_paused = true)]
    async fn clean_exit_stops_every_other_worker() {
        let clean = Plan::Exit {
            after: Duration::from_secs(2),
            code: Some(0),
        };
        let launcher = Arc::new(FakeLauncher::default().plan(0, &[clean]));
        let supervisor = Supervisor::new(launcher.clone(), settings());

        let exit = supervisor
            .run(workers(&[0, 1, 2]), std::future::pending())
            .await;

        assert_eq!(exit, SupervisorExit::ManualExit);
        assert_eq!(exit.code(), std::process::ExitCode::SUCCESS);
        assert_eq!(launcher.kills(), 2);
        assert_eq!(launcher.launches_of(1).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_stops_all_workers() {
        let launcher = Arc::new(FakeLauncher::default());
        let supervisor = Supervisor::new(launcher.clone(), settings());

        let exit = supervisor
            .run(
                workers(&[0, 1]),
                tokio::time::sleep(Duration::from_secs(1)),
            )
            .await;

        assert_eq!(exit, SupervisorExit::Interrupted);
        assert_eq!(exit.code(), std::process::ExitCode::FAILURE);
        assert_eq!(launcher.kills(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_worker_does_not_stop_siblings() {
        let clean = Plan::Exit {
            after: Duration::from_secs(3),
            code: Some(0),
        };
        let launcher = Arc::new(
            FakeLauncher::default()
                .plan(0, &[Plan::SpawnError])
                .plan(1, &[crash(9), clean]),
        );
        let supervisor = Supervisor::new(launcher.clone(), settings());

        let exit = supervisor
            .run(workers(&[0, 1]), std::future::pending())
            .await;

        assert_eq!(exit, SupervisorExit::ManualExit);
        assert!(launcher.launches_of(0).is_empty());
        assert_eq!(launcher.launches_of(1).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn all_tasks_failing_leaves_supervisor_idle() {
        let launcher = Arc::new(
            FakeLauncher::default()
                .plan(0, &[Plan::SpawnError])
                .plan(1, &[Plan::SpawnError]),
        );
        let supervisor = Supervisor::new(launcher, settings());

        let exit = supervisor
            .run(workers(&[0, 1]), std::future::pending())
            .await;
        assert_eq!(exit, SupervisorExit::Idle);
        assert_eq!(exit.code(), std::process::ExitCode::FAILURE);
    }

    #[test]
    fn stray_cleanup_follows_config() {
        let mut config = SupervisorConfig {
            restart_delay_ms: 1200,
            ..SupervisorConfig::default()
        };
        let settings = SupervisorSettings::from_config(&config, "kiosk-worker".into());
        assert_eq!(settings.stray_process_name, None);

        config.kill_strays_by_name = true;
        let settings = SupervisorSettings::from_config(&config, "kiosk-worker".into());
        assert_eq!(settings.stray_process_name.as_deref(), Some("kiosk-worker"));
        assert_eq!(settings.restart_delay, Duration::from_millis(1200));
    }
}
