mod cli;
mod error;
mod launcher;
mod retention;
mod supervisor;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use kiosk_config::KioskConfig;
use kiosk_platform::{LogTarget, SweepPolicy};

use error::SupervisorError;
use launcher::ProcessLauncher;
use supervisor::{Supervisor, SupervisorExit, SupervisorSettings};

fn install_panic_hook(log_dir: Option<PathBuf>) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let path = log_dir.as_deref().and_then(|dir| {
            kiosk_platform::crash_report::write_crash_report(info, "supervisor", dir)
        });

        eprintln!("\n--- kiosk supervisor crashed ---");
        if let Some(p) = &path {
            eprintln!("Crash report written to: {}", p.display());
        }
        eprintln!("--------------------------------\n");

        default_hook(info);
    }));
}

/// Absolute form of a `--config` path, so workers started from another
/// directory still find it.
fn absolute_config_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let config_path = args.config.as_deref().map(absolute_config_path);
    let loaded = match &config_path {
        Some(path) => kiosk_config::load_config_from(path),
        None => kiosk_config::load_config(),
    };

    // Logging comes up even when the config is rejected, so the reason is recorded.
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| format!("kiosk={}", logging.level.as_filter()));
    let log_dir = kiosk_platform::resolve_log_dir(logging.directory.as_deref()).ok();
    install_panic_hook(log_dir.clone());
    if let Some(dir) = &log_dir {
        if let Err(e) = kiosk_platform::ensure_dirs(dir) {
            eprintln!("Failed to create kiosk directories: {e}");
        }
    }
    let file_dir = log_dir.as_deref().filter(|_| logging.file_logging);
    if let Err(e) = kiosk_platform::init_logging(&LogTarget {
        role: "supervisor",
        directive: &directive,
        file_dir,
    }) {
        eprintln!("Failed to initialize logging: {e}");
    }

    tracing::info!("kiosk v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = log_dir {
        retention::spawn_log_sweep(
            dir,
            SweepPolicy::new(config.logging.retention()),
            config.logging.sweep_interval(),
        );
    }

    match run(config, config_path).await {
        Ok(exit) => {
            tracing::info!(?exit, "Supervisor finished");
            exit.code()
        }
        Err(e) => {
            tracing::error!(error = %e, "Supervisor failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    config: KioskConfig,
    config_path: Option<PathBuf>,
) -> Result<SupervisorExit, SupervisorError> {
    let binary = kiosk_platform::resolve_worker_binary(config.supervisor.worker_binary.as_deref())?;
    tracing::info!(
        binary = %binary.display(),
        workers = config.workers.len(),
        "Worker binary resolved"
    );

    let settings =
        SupervisorSettings::from_config(&config.supervisor, kiosk_platform::worker_binary_name());
    let launcher = Arc::new(ProcessLauncher::new(binary, config_path));
    let supervisor = Supervisor::new(launcher, settings);

    Ok(supervisor.run(config.workers, shutdown_signal()).await)
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
