//! Blocking dialogs shown on the kiosk window.

use std::cell::OnceCell;
use std::rc::Rc;
use std::sync::Arc;

use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use winit::window::Window;

use kiosk_session::{ReloadChoice, UserPrompt};

const REFRESH: &str = "Refresh";
const HOME: &str = "Home";
const CANCEL: &str = "Cancel";

pub struct DialogPrompt {
    parent: Rc<OnceCell<Arc<Window>>>,
}

impl DialogPrompt {
    pub fn new(parent: Rc<OnceCell<Arc<Window>>>) -> Self {
        Self { parent }
    }

    fn dialog(&self) -> MessageDialog {
        let dialog = MessageDialog::new();
        match self.parent.get() {
            Some(window) => dialog.set_parent(window.as_ref()),
            None => dialog,
        }
    }
}

/// Map a dialog answer onto a reload choice. Anything unexpected (closing
/// the dialog included) is a cancel.
fn reload_choice(result: MessageDialogResult) -> ReloadChoice {
    match result {
        MessageDialogResult::Custom(label) if label == REFRESH => ReloadChoice::Refresh,
        MessageDialogResult::Custom(label) if label == HOME => ReloadChoice::Home,
        MessageDialogResult::Yes => ReloadChoice::Refresh,
        MessageDialogResult::No => ReloadChoice::Home,
        _ => ReloadChoice::Cancel,
    }
}

impl UserPrompt for DialogPrompt {
    fn confirm_reload(&mut self) -> Result<ReloadChoice, String> {
        let result = self
            .dialog()
            .set_level(MessageLevel::Info)
            .set_title("Reload")
            .set_description("Reload this page, or go back to the start page?")
            .set_buttons(MessageButtons::YesNoCancelCustom(
                REFRESH.to_string(),
                HOME.to_string(),
                CANCEL.to_string(),
            ))
            .show();
        let choice = reload_choice(result);
        tracing::debug!(?choice, "refresh prompt answered");
        Ok(choice)
    }

    fn show_error(&mut self, message: &str) {
        self.dialog()
            .set_level(MessageLevel::Error)
            .set_title("Kiosk")
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
