use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;

use kiosk_platform::{sweep_logs, SweepPolicy, SweepReport};

/// Sweep old logs now, then every `interval` when one is configured.
pub fn spawn_log_sweep(
    dir: PathBuf,
    policy: SweepPolicy,
    interval: Option<Duration>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        sweep_once(&dir, &policy).await;

        let Some(interval) = interval else { return };
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep_once(&dir, &policy).await;
        }
    })
}

async fn sweep_once(dir: &std::path::Path, policy: &SweepPolicy) -> Option<SweepReport> {
    let dir = dir.to_path_buf();
    let policy = policy.clone();
    let result =
        tokio::task::spawn_blocking(move || sweep_logs(&dir, &policy, SystemTime::now())).await;

    match result {
        Ok(Ok(report)) => {
            if report.deleted > 0 || report.failed > 0 {
                tracing::info!(
                    deleted = report.deleted,
                    failed = report.failed,
                    "Log retention sweep finished"
                );
            }
            Some(report)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Log retention sweep failed");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Log retention sweep task panicked");
            None
        }
    }
}
