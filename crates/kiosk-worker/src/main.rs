mod app_state;
mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use winit::event_loop::EventLoop;

use kiosk_common::KioskError;
use kiosk_config::{KeyboardConfig, KioskConfig, WorkerConfig};
use kiosk_platform::LogTarget;
use kiosk_session::{seeder, SessionEvent};

use app_state::{KioskWorker, WorkerExit};

fn install_panic_hook(role: String, log_dir: Option<PathBuf>) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let path = log_dir
            .as_deref()
            .and_then(|dir| kiosk_platform::crash_report::write_crash_report(info, &role, dir));

        eprintln!("\n--- {role} crashed ---");
        if let Some(p) = &path {
            eprintln!("Crash report written to: {}", p.display());
        }
        eprintln!("----------------------\n");

        default_hook(info);
    }));
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config is read first: it decides where the log goes.
    let (config, config_error) = match kiosk_config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (KioskConfig::default(), Some(e)),
    };
    let contract = kiosk_config::worker_args::from_args(&args.contract);
    let role = match &contract {
        Ok((worker, _)) => format!("worker-{}", worker.monitor_index),
        Err(_) => "worker".to_string(),
    };

    let log_dir = kiosk_platform::resolve_log_dir(config.logging.directory.as_deref()).ok();
    install_panic_hook(role.clone(), log_dir.clone());

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| format!("kiosk={}", config.logging.level.as_filter()));
    // Without a monitor index there is no file name the sweep would match.
    let file_dir = log_dir
        .as_deref()
        .filter(|_| config.logging.file_logging && contract.is_ok());
    if let Err(e) = kiosk_platform::init_logging(&LogTarget {
        role: &role,
        directive: &directive,
        file_dir,
    }) {
        eprintln!("Failed to initialize logging: {e}");
    }

    tracing::info!(role = %role, "kiosk-worker v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let (mut worker, seed) = match contract {
        Ok(contract) => contract,
        Err(e) => {
            tracing::error!(error = %e, "invalid worker arguments, nothing to show");
            return ExitCode::FAILURE;
        }
    };
    worker.local_storage = seeder::parse_seed_lenient(&seed);

    match run(worker, config.keyboard) {
        Ok(exit) => {
            tracing::info!(?exit, "worker finished");
            exit.code()
        }
        Err(e) => {
            tracing::error!(error = %e, "worker failed");
            ExitCode::FAILURE
        }
    }
}

fn run(worker: WorkerConfig, keyboard: KeyboardConfig) -> kiosk_common::Result<WorkerExit> {
    let event_loop = EventLoop::<SessionEvent>::with_user_event()
        .build()
        .map_err(|e| KioskError::EventLoop(format!("cannot create: {e}")))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("kiosk-timers")
        .enable_time()
        .build()?;

    let mut app = KioskWorker::new(worker, keyboard, event_loop.create_proxy(), runtime);

    tracing::debug!("Entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| KioskError::EventLoop(e.to_string()))?;

    Ok(app.finish())
}
