//! `ApplicationHandler` implementation for the winit event loop.

use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use kiosk_session::{Flow, SessionEvent};

use super::core::{KioskWorker, WorkerExit};

impl ApplicationHandler<SessionEvent> for KioskWorker {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit.is_some() {
            return;
        }
        self.start_session(event_loop);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: SessionEvent) {
        match self.session.dispatch(event, Instant::now()) {
            Flow::Continue => {}
            Flow::ManualExit => {
                self.set_exit(WorkerExit::ManualExit);
                event_loop.exit();
            }
            Flow::Shutdown => {
                self.set_exit(WorkerExit::Failed);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            tracing::info!("Window close requested");
            self.set_exit(WorkerExit::Closed);
            self.shutdown();
            event_loop.exit();
        }
    }
}
