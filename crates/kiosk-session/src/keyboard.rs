//! On-screen keyboard bridge.
//!
//! Best-effort throughout: nothing here can fail the session.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use kiosk_config::KeyboardConfig;

use crate::context::{DeferredAction, OwnerContext};
use crate::guard::DebounceGuard;

pub const KEYBOARD_DEBOUNCE: Duration = Duration::from_millis(700);
pub const KEYBOARD_VERIFY_DELAY: Duration = Duration::from_millis(500);

/// Launches keyboard helpers and finds their windows.
pub trait KeyboardHost {
    /// Start `program`. Fails if it does not exist or cannot be spawned.
    fn launch(&mut self, program: &Path) -> io::Result<()>;

    fn has_visible_window(&mut self, program: &Path) -> bool;

    /// Bring an existing window of `program` back. `false` if there is none.
    fn restore_window(&mut self, program: &Path) -> bool;

    /// Stop running instances of `program`, returning how many were stopped.
    fn terminate(&mut self, program: &Path) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardOutcome {
    Debounced,
    Launched(PathBuf),
    FellBack,
}

pub struct KeyboardBridge {
    debounce: DebounceGuard,
    config: KeyboardConfig,
    host: Box<dyn KeyboardHost>,
    generation: u64,
    awaiting: Option<(u64, PathBuf)>,
}

impl KeyboardBridge {
    pub fn new(config: KeyboardConfig, host: Box<dyn KeyboardHost>) -> Self {
        Self {
            debounce: DebounceGuard::new(KEYBOARD_DEBOUNCE),
            config,
            host,
            generation: 0,
            awaiting: None,
        }
    }

    /// Handle `SHOW_OSK`.
    pub fn on_request(&mut self, now: Instant, ctx: &dyn OwnerContext) -> KeyboardOutcome {
        if !self.debounce.try_accept(now) {
            tracing::debug!("keyboard request debounced");
            return KeyboardOutcome::Debounced;
        }

        let Some(path) = self.launch_primary() else {
            self.fall_back();
            return KeyboardOutcome::FellBack;
        };
        self.generation += 1;
        self.awaiting = Some((self.generation, path.clone()));
        ctx.post_after(
            KEYBOARD_VERIFY_DELAY,
            DeferredAction::KeyboardCheck {
                generation: self.generation,
            },
        );
        KeyboardOutcome::Launched(path)
    }

    fn launch_primary(&mut self) -> Option<PathBuf> {
        for path in &self.config.primary {
            match self.host.launch(path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "keyboard helper launched");
                    return Some(path.clone());
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "keyboard helper unavailable")
                }
            }
        }
        tracing::warn!("no primary keyboard helper could be launched");
        None
    }

    /// The verification delay elapsed. Returns whether the fallback ran.
    pub fn on_check(&mut self, generation: u64) -> bool {
        let Some((armed, path)) = self.awaiting.take() else {
            return false;
        };
        if armed != generation {
            self.awaiting = Some((armed, path));
            return false;
        }
        if self.host.has_visible_window(&path) {
            tracing::debug!(path = %path.display(), "keyboard helper is up");
            return false;
        }
        tracing::warn!(path = %path.display(), "keyboard helper shows no window");
        self.fall_back();
        true
    }

    fn fall_back(&mut self) {
        let secondary = self.config.secondary.clone();
        if self.host.restore_window(&secondary) {
            tracing::info!(path = %secondary.display(), "restored fallback keyboard");
            return;
        }
        let stopped = self.host.terminate(&secondary);
        match self.host.launch(&secondary) {
            Ok(()) => tracing::info!(path = %secondary.display(), stopped, "fallback keyboard launched"),
            Err(e) => tracing::warn!(path = %secondary.display(), error = %e, "fallback keyboard failed"),
        }
    }
}
