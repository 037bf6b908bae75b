//! KioskWorker struct definition and constructor.

use std::cell::OnceCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;

use tokio::runtime::Runtime;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use kiosk_config::{KeyboardConfig, WorkerConfig};
use kiosk_session::{SessionController, SessionDeps, SessionEvent};

use super::context::ProxyContext;
use super::dialogs::DialogPrompt;
use super::keyboard_host::ProcessKeyboardHost;

/// How a worker process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    /// The user left through the exit control.
    ManualExit,
    /// The session never became active (no such display, engine failed).
    NotStarted { reason: String },
    /// The session ended on an error.
    Failed,
    /// The window was closed from outside.
    Closed,
}

impl WorkerExit {
    /// Only a manual exit is a success; the supervisor restarts the rest.
    pub fn code(&self) -> ExitCode {
        match self {
            WorkerExit::ManualExit => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }
    }
}

/// Top-level worker state.
pub struct KioskWorker {
    pub(super) session: SessionController,
    pub(super) proxy: EventLoopProxy<SessionEvent>,
    pub(super) runtime: Option<Runtime>,

    // Windowing
    pub(super) window: Option<Arc<Window>>,
    /// Shared with the dialogs so they stay on top of the kiosk window.
    pub(super) dialog_parent: Rc<OnceCell<Arc<Window>>>,

    pub(super) exit: Option<WorkerExit>,
}

impl KioskWorker {
    pub fn new(
        worker: WorkerConfig,
        keyboard: KeyboardConfig,
        proxy: EventLoopProxy<SessionEvent>,
        runtime: Runtime,
    ) -> Self {
        let dialog_parent = Rc::new(OnceCell::new());
        let deps = SessionDeps {
            prompt: Box::new(DialogPrompt::new(Rc::clone(&dialog_parent))),
            context: Box::new(ProxyContext::new(proxy.clone(), runtime.handle().clone())),
            keyboard: Box::new(ProcessKeyboardHost::default()),
        };
        Self {
            session: SessionController::new(worker, keyboard, deps),
            proxy,
            runtime: Some(runtime),
            window: None,
            dialog_parent,
            exit: None,
        }
    }

    /// Record why the worker is ending, keeping the first reason.
    pub(super) fn set_exit(&mut self, exit: WorkerExit) {
        if self.exit.is_none() {
            self.exit = Some(exit);
        }
    }

    /// Tear down and report how the worker ended.
    pub fn finish(mut self) -> WorkerExit {
        self.shutdown();
        self.exit.take().unwrap_or(WorkerExit::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_manual_exit_succeeds() {
        assert_eq!(WorkerExit::ManualExit.code(), ExitCode::SUCCESS);
        assert_eq!(WorkerExit::Failed.code(), ExitCode::FAILURE);
        assert_eq!(WorkerExit::Closed.code(), ExitCode::FAILURE);
        assert_eq!(
            WorkerExit::NotStarted {
                reason: "no display 2".into()
            }
            .code(),
            ExitCode::FAILURE
        );
    }
}
