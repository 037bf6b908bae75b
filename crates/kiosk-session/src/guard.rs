//! Debounce and mutual-exclusion primitives for the inbound protocols.
//!
//! Both live on the worker's single event context, so plain `Cell` state
//! is enough; the point of the types is that release cannot be forgotten.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Minimum spacing between two accepted triggers of one protocol message.
#[derive(Debug, Clone)]
pub struct DebounceGuard {
    last_accepted: Option<Instant>,
    window: Duration,
}

impl DebounceGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            last_accepted: None,
            window,
        }
    }

    /// Accept the trigger at `now` unless the previous accepted one is
    /// closer than the window. Only accepted triggers move the window.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

/// At most one open confirmation prompt per worker.
///
/// Clones share state, so a dialog host can observe the gate while the
/// prompt it guards is up.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    open: Rc<Cell<bool>>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Open the gate, or `None` if a prompt is already open. The gate
    /// closes when the returned guard drops, on every exit path.
    pub fn try_open(&self) -> Option<GateGuard> {
        if self.open.replace(true) {
            return None;
        }
        Some(GateGuard {
            open: Rc::clone(&self.open),
        })
    }
}

/// Holds a [`ConfirmationGate`] open for one prompt lifecycle.
#[derive(Debug)]
pub struct GateGuard {
    open: Rc<Cell<bool>>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.open.set(false);
    }
}
