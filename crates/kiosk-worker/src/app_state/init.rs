//! Window creation and engine setup.

use std::sync::{Arc, Mutex};

use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, WindowAttributes};

use kiosk_session::{EngineEvent, SessionEvent};
use kiosk_webview::{EventSink, WebViewSettings, WryEngine};

use super::core::{KioskWorker, WorkerExit};

// =============================================================================
// INITIALIZATION
// =============================================================================

impl KioskWorker {
    /// Cover the configured display and bring the session up.
    ///
    /// A missing display or an engine that will not start ends the worker
    /// cleanly without an error dialog.
    pub(super) fn start_session(&mut self, event_loop: &ActiveEventLoop) {
        let monitor_index = self.session.config().monitor_index;
        let Some(monitor) = event_loop.available_monitors().nth(monitor_index as usize) else {
            self.abort(event_loop, format!("no display with index {monitor_index}"));
            return;
        };
        tracing::info!(
            monitor = monitor_index,
            name = monitor.name().as_deref().unwrap_or("unknown"),
            "Covering display"
        );

        let attrs = WindowAttributes::default()
            .with_title(format!("Kiosk {monitor_index}"))
            .with_decorations(false)
            .with_position(monitor.position())
            .with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.abort(event_loop, format!("failed to create window: {e}"));
                return;
            }
        };

        let config = self.session.config();
        let settings = WebViewSettings::new(monitor_index, config.url.clone())
            .with_document_scripts(self.session.document_scripts())
            .with_devtools(config.dev_tools_on_start || cfg!(debug_assertions));

        let engine = match WryEngine::build(window.as_ref(), settings, self.event_sink()) {
            Ok(engine) => engine,
            Err(e) => {
                self.abort(event_loop, e.to_string());
                return;
            }
        };
        tracing::debug!(capabilities = ?engine.capabilities(), "engine ready");

        if let Err(e) = self.session.activate(Box::new(engine)) {
            tracing::error!(error = %e, "session could not start");
            self.set_exit(WorkerExit::Failed);
            event_loop.exit();
            return;
        }

        let _ = self.dialog_parent.set(Arc::clone(&window));
        self.window = Some(window);
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, reason: String) {
        self.session.abort_start(&reason);
        self.set_exit(WorkerExit::NotStarted { reason });
        event_loop.exit();
    }

    /// Engine callbacks go through the event loop like everything else.
    fn event_sink(&self) -> EventSink {
        let proxy = Mutex::new(self.proxy.clone());
        Arc::new(move |event: EngineEvent| {
            let Ok(proxy) = proxy.lock() else {
                return;
            };
            if proxy.send_event(SessionEvent::Engine(event)).is_err() {
                tracing::trace!("event loop closed, engine event dropped");
            }
        })
    }
}
