//! User-facing dialogs.

/// Answer to the pull-to-refresh confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadChoice {
    Refresh,
    Cancel,
    Home,
}

/// Blocking dialogs shown on the worker's display.
pub trait UserPrompt {
    /// Ask whether to reload. Blocks until the user answers.
    fn confirm_reload(&mut self) -> Result<ReloadChoice, String>;

    /// Tell the user the session is about to end because of `message`.
    fn show_error(&mut self, message: &str);
}
