//! Recording fakes for the session's collaborators.
//!
//! Each fake is a cheap handle over shared state, so a test keeps one clone
//! and hands the other to the code under test.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::context::{DeferredAction, OwnerContext};
use crate::engine::{Engine, EngineError};
use crate::guard::ConfirmationGate;
use crate::keyboard::KeyboardHost;
use crate::prompt::{ReloadChoice, UserPrompt};

// -- engine --

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Navigate(String),
    Script(String),
    Reload,
    DevTools,
}

#[derive(Clone, Default)]
pub struct FakeEngine {
    calls: Rc<RefCell<Vec<EngineCall>>>,
    url: Rc<RefCell<Option<String>>>,
    fail_navigation: Rc<Cell<bool>>,
    fail_reload: Rc<Cell<bool>>,
}

impl FakeEngine {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                EngineCall::Navigate(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                EngineCall::Script(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn set_url(&self, url: &str) {
        *self.url.borrow_mut() = Some(url.to_string());
    }

    pub fn fail_navigation(&self, fail: bool) {
        self.fail_navigation.set(fail);
    }

    pub fn fail_reload(&self, fail: bool) {
        self.fail_reload.set(fail);
    }
}

impl Engine for FakeEngine {
    fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(EngineCall::Navigate(url.to_string()));
        if self.fail_navigation.get() {
            return Err(EngineError::Navigate {
                url: url.to_string(),
                reason: "refused".into(),
            });
        }
        Ok(())
    }

    fn execute_script(&mut self, script: &str) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(EngineCall::Script(script.to_string()));
        Ok(())
    }

    fn reload(&mut self) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(EngineCall::Reload);
        if self.fail_reload.get() {
            return Err(EngineError::Script("reload refused".into()));
        }
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        self.url.borrow().clone()
    }

    fn open_dev_tools(&mut self) {
        self.calls.borrow_mut().push(EngineCall::DevTools);
    }
}

// -- prompt --

#[derive(Clone, Default)]
pub struct FakePrompt {
    answers: Rc<RefCell<VecDeque<Result<ReloadChoice, String>>>>,
    asked: Rc<Cell<usize>>,
    errors: Rc<RefCell<Vec<String>>>,
    gate: Option<ConfirmationGate>,
    gate_seen_open: Rc<Cell<Option<bool>>>,
}

impl FakePrompt {
    pub fn answering(choices: impl IntoIterator<Item = ReloadChoice>) -> Self {
        let prompt = Self::default();
        prompt.answers.borrow_mut().extend(choices.into_iter().map(Ok));
        prompt
    }

    pub fn failing(reason: &str) -> Self {
        let prompt = Self::default();
        prompt.answers.borrow_mut().push_back(Err(reason.to_string()));
        prompt
    }

    pub fn push(&self, choice: ReloadChoice) {
        self.answers.borrow_mut().push_back(Ok(choice));
    }

    pub fn observe_gate(&mut self, gate: ConfirmationGate) {
        self.gate = Some(gate);
    }

    pub fn asked(&self) -> usize {
        self.asked.get()
    }

    pub fn gate_seen_open(&self) -> Option<bool> {
        self.gate_seen_open.get()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl UserPrompt for FakePrompt {
    fn confirm_reload(&mut self) -> Result<ReloadChoice, String> {
        self.asked.set(self.asked.get() + 1);
        if let Some(gate) = &self.gate {
            self.gate_seen_open.set(Some(gate.is_open()));
        }
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(ReloadChoice::Cancel))
    }

    fn show_error(&mut self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

// -- owner context --

#[derive(Clone, Default)]
pub struct FakeContext {
    posted: Rc<RefCell<Vec<(Duration, DeferredAction)>>>,
}

impl FakeContext {
    /// Drain everything posted so far.
    pub fn take(&self) -> Vec<(Duration, DeferredAction)> {
        std::mem::take(&mut *self.posted.borrow_mut())
    }
}

impl OwnerContext for FakeContext {
    fn post_after(&self, delay: Duration, action: DeferredAction) {
        self.posted.borrow_mut().push((delay, action));
    }
}

// -- keyboard host --

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Launch(PathBuf),
    Visible(PathBuf),
    Restore(PathBuf),
    Terminate(PathBuf),
}

#[derive(Clone, Default)]
pub struct FakeKeyboardHost {
    calls: Rc<RefCell<Vec<HostCall>>>,
    launchable: Rc<RefCell<HashSet<PathBuf>>>,
    visible: Rc<Cell<bool>>,
    restorable: Rc<Cell<bool>>,
}

impl FakeKeyboardHost {
    pub fn with_launchable<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let host = Self::default();
        host.launchable
            .borrow_mut()
            .extend(paths.into_iter().map(PathBuf::from));
        host
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    pub fn set_restorable(&self, restorable: bool) {
        self.restorable.set(restorable);
    }
}

impl KeyboardHost for FakeKeyboardHost {
    fn launch(&mut self, program: &Path) -> io::Result<()> {
        self.calls.borrow_mut().push(HostCall::Launch(program.to_path_buf()));
        if self.launchable.borrow().contains(program) {
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such helper"))
        }
    }

    fn has_visible_window(&mut self, program: &Path) -> bool {
        self.calls.borrow_mut().push(HostCall::Visible(program.to_path_buf()));
        self.visible.get()
    }

    fn restore_window(&mut self, program: &Path) -> bool {
        self.calls.borrow_mut().push(HostCall::Restore(program.to_path_buf()));
        self.restorable.get()
    }

    fn terminate(&mut self, program: &Path) -> usize {
        self.calls.borrow_mut().push(HostCall::Terminate(program.to_path_buf()));
        1
    }
}
