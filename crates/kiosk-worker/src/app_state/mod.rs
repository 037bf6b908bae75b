//! Worker application state.
//!
//! Implements `winit::application::ApplicationHandler` over
//! [`kiosk_session::SessionEvent`] user events: the event loop is the
//! session's single execution context, and wry callbacks and deferred
//! actions both arrive through its proxy.

mod context;
mod core;
mod dialogs;
mod event_handler;
mod init;
mod keyboard_host;
mod shutdown;

pub use core::{KioskWorker, WorkerExit};
