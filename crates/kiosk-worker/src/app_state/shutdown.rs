//! Orderly teardown.

use std::time::Duration;

use super::core::KioskWorker;

// =============================================================================
// SHUTDOWN
// =============================================================================

impl KioskWorker {
    /// Tear the worker down. Safe to call more than once.
    ///
    /// The session goes first so the WebView is gone before the window,
    /// then pending timers are dropped.
    pub(super) fn shutdown(&mut self) {
        self.session.shutdown();

        if let Some(rt) = self.runtime.take() {
            rt.shutdown_timeout(Duration::from_millis(250));
        }

        self.window = None;
    }
}
