//! Per-worker session logic for a kiosk browser.
//!
//! Everything here is engine-agnostic: the rendering engine, the dialog
//! surface, the owner event loop, and the keyboard helper host are traits,
//! so the whole state machine runs (and is tested) without a window.
//!
//! - [`controller::SessionController`]: `Starting → Active → ShuttingDown`
//!   state machine, sole consumer of engine events
//! - [`exit_matcher`]: when the exit control is shown
//! - [`seeder`]: localStorage seeding script
//! - [`reload`]: pull-to-refresh confirmation and forced-reload fallback
//! - [`keyboard`]: on-screen keyboard helper bridge
//! - [`console`]: page console forwarding

pub mod console;
pub mod context;
pub mod controller;
pub mod engine;
pub mod error;
pub mod exit_matcher;
pub mod guard;
pub mod keyboard;
pub mod page_scripts;
pub mod prompt;
pub mod protocol;
pub mod reload;
pub mod seeder;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{DeferredAction, OwnerContext, SessionEvent};
pub use controller::{Flow, NavigationSnapshot, SessionController, SessionDeps, SessionState};
pub use engine::{Engine, EngineError, EngineEvent};
pub use error::SessionError;
pub use guard::{ConfirmationGate, DebounceGuard, GateGuard};
pub use keyboard::{KeyboardBridge, KeyboardHost};
pub use prompt::{ReloadChoice, UserPrompt};
pub use protocol::InboundMessage;
