//! Deferred work posted back onto the worker's event context.

use std::time::Duration;

use crate::engine::EngineEvent;

/// A step scheduled by one of the protocols, run when its delay elapses.
///
/// Each carries the generation that armed it; a check whose generation is
/// no longer current is dropped when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    /// Did the requested reload actually start navigating?
    ReloadCheck { generation: u64 },
    /// Second half of the forced reload: leave `about:blank` for `url`.
    ReloadRestore { generation: u64, url: String },
    /// Did the primary keyboard helper produce a window?
    KeyboardCheck { generation: u64 },
}

/// Everything the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Engine(EngineEvent),
    Deferred(DeferredAction),
}

impl From<EngineEvent> for SessionEvent {
    fn from(event: EngineEvent) -> Self {
        SessionEvent::Engine(event)
    }
}

impl From<DeferredAction> for SessionEvent {
    fn from(action: DeferredAction) -> Self {
        SessionEvent::Deferred(action)
    }
}

/// The owner of the worker's single execution context.
///
/// `post_after` must deliver the action back to that same context (never
/// run it on a timer thread) so the session sees events strictly in order.
pub trait OwnerContext {
    fn post_after(&self, delay: Duration, action: DeferredAction);
}
