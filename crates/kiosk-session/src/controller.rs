//! The per-worker session state machine.
//!
//! `Starting → Active → ShuttingDown`. The controller is the only consumer
//! of engine events and deferred actions, and it sees them one at a time on
//! the worker's event context.

use std::fmt;
use std::time::Instant;

use kiosk_config::{KeyboardConfig, WorkerConfig};
use tracing::Span;

use crate::console::{self, CONSOLE_CAPTURE_SCRIPT};
use crate::context::{DeferredAction, OwnerContext, SessionEvent};
use crate::engine::{Engine, EngineEvent};
use crate::error::SessionError;
use crate::exit_matcher;
use crate::keyboard::{KeyboardBridge, KeyboardHost};
use crate::page_scripts::{
    exit_control_visibility, EXIT_CONTROL_SCRIPT, KEYBOARD_REQUEST_SCRIPT, PULL_TO_REFRESH_SCRIPT,
};
use crate::prompt::UserPrompt;
use crate::protocol::InboundMessage;
use crate::reload::ReloadProtocol;
use crate::seeder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Starting,
    Active,
    ShuttingDown,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Starting => "starting",
            SessionState::Active => "active",
            SessionState::ShuttingDown => "shutting down",
        })
    }
}

/// What the worker should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The user left through the exit control. Exit code 0.
    ManualExit,
    /// The session ended on an error. Non-zero exit.
    Shutdown,
}

/// Last known navigation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub current_address: String,
}

/// Collaborators the controller owns for its lifetime.
pub struct SessionDeps {
    pub prompt: Box<dyn UserPrompt>,
    pub context: Box<dyn OwnerContext>,
    pub keyboard: Box<dyn KeyboardHost>,
}

pub struct SessionController {
    config: WorkerConfig,
    state: SessionState,
    span: Span,
    engine: Option<Box<dyn Engine>>,
    prompt: Box<dyn UserPrompt>,
    context: Box<dyn OwnerContext>,
    snapshot: NavigationSnapshot,
    exit_visible: bool,
    reload: ReloadProtocol,
    keyboard: KeyboardBridge,
}

impl SessionController {
    pub fn new(config: WorkerConfig, keyboard: KeyboardConfig, deps: SessionDeps) -> Self {
        let span = tracing::info_span!("session", monitor = config.monitor_index);
        Self {
            reload: ReloadProtocol::new(config.url.clone()),
            keyboard: KeyboardBridge::new(keyboard, deps.keyboard),
            config,
            state: SessionState::Starting,
            span,
            engine: None,
            prompt: deps.prompt,
            context: deps.context,
            snapshot: NavigationSnapshot::default(),
            exit_visible: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &NavigationSnapshot {
        &self.snapshot
    }

    pub fn exit_visible(&self) -> bool {
        self.exit_visible
    }

    /// Scripts to register at document creation, in order. The seed goes
    /// first so storage is populated before anything else runs.
    pub fn document_scripts(&self) -> Vec<String> {
        let mut scripts = Vec::new();
        if let Some(seed) = seeder::build_seed_script(&self.config.local_storage) {
            scripts.push(seed);
        }
        if self.config.log_console_messages {
            scripts.push(CONSOLE_CAPTURE_SCRIPT.to_string());
        }
        scripts.push(PULL_TO_REFRESH_SCRIPT.to_string());
        scripts.push(KEYBOARD_REQUEST_SCRIPT.to_string());
        scripts.push(EXIT_CONTROL_SCRIPT.to_string());
        scripts
    }

    /// Attach the engine and go live.
    pub fn activate(&mut self, engine: Box<dyn Engine>) -> Result<(), SessionError> {
        let span = self.span.clone();
        let _enter = span.enter();

        if self.state != SessionState::Starting {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: SessionState::Active,
            });
        }
        let engine = self.engine.insert(engine);
        if self.config.dev_tools_on_start {
            engine.open_dev_tools();
        }
        self.state = SessionState::Active;
        tracing::info!(url = %self.config.url, allow_exit = self.config.allow_exit, "session active");
        Ok(())
    }

    /// Give up before activation. Not an error: the worker just has nothing
    /// to show (no such display, engine unavailable).
    pub fn abort_start(&mut self, reason: &str) {
        let _enter = self.span.enter();
        if self.state == SessionState::Starting {
            tracing::info!(reason, "session not started");
            self.state = SessionState::ShuttingDown;
        }
    }

    /// Stop without an error, e.g. the window was closed.
    pub fn shutdown(&mut self) {
        let _enter = self.span.enter();
        if self.state != SessionState::ShuttingDown {
            tracing::info!(from = %self.state, "session shutting down");
        }
        self.state = SessionState::ShuttingDown;
        self.engine = None;
    }

    /// Handle one event. Any error ends the session after telling the user.
    pub fn dispatch(&mut self, event: SessionEvent, now: Instant) -> Flow {
        let span = self.span.clone();
        let _enter = span.enter();

        match self.state {
            SessionState::Active => {}
            SessionState::Starting => {
                tracing::debug!(?event, "event before activation ignored");
                return Flow::Continue;
            }
            SessionState::ShuttingDown => {
                tracing::trace!(?event, "event after shutdown ignored");
                return Flow::Shutdown;
            }
        }

        match self.handle(event, now) {
            Ok(Flow::ManualExit) => {
                self.state = SessionState::ShuttingDown;
                self.engine = None;
                Flow::ManualExit
            }
            Ok(flow) => flow,
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: SessionError) -> Flow {
        tracing::error!(error = %error, "session failed");
        self.prompt
            .show_error(&format!("The kiosk page stopped working: {error}"));
        self.state = SessionState::ShuttingDown;
        self.engine = None;
        Flow::Shutdown
    }

    fn handle(&mut self, event: SessionEvent, now: Instant) -> Result<Flow, SessionError> {
        match event {
            SessionEvent::Engine(EngineEvent::NavigationStarting { url }) => {
                self.reload.on_navigation_starting();
                self.on_address(url);
            }
            SessionEvent::Engine(
                EngineEvent::NavigationCompleted { url } | EngineEvent::AddressChanged { url },
            ) => self.on_address(url),
            SessionEvent::Engine(EngineEvent::Message { body }) => {
                return self.on_message(&body, now);
            }
            SessionEvent::Deferred(DeferredAction::ReloadCheck { generation }) => {
                let engine = self.engine.as_deref_mut().ok_or(SessionError::NoEngine)?;
                self.reload.on_check(generation, engine, self.context.as_ref());
            }
            SessionEvent::Deferred(DeferredAction::ReloadRestore { generation, url }) => {
                let engine = self.engine.as_deref_mut().ok_or(SessionError::NoEngine)?;
                self.reload.on_restore(generation, &url, engine);
            }
            SessionEvent::Deferred(DeferredAction::KeyboardCheck { generation }) => {
                self.keyboard.on_check(generation);
            }
        }
        Ok(Flow::Continue)
    }

    fn on_address(&mut self, url: String) {
        let url = if url.is_empty() {
            self.engine
                .as_deref()
                .and_then(|e| e.current_url())
                .unwrap_or_default()
        } else {
            url
        };
        tracing::debug!(url = %url, "address changed");
        self.snapshot.current_address = url;
        self.update_exit_control();
    }

    fn update_exit_control(&mut self) {
        let visible = self.config.allow_exit
            && exit_matcher::matches(
                &self.snapshot.current_address,
                self.config.effective_exit_url(),
            );
        if visible != self.exit_visible {
            tracing::info!(visible, "exit control");
        }
        self.exit_visible = visible;

        // Pushed on every navigation: a fresh document starts hidden.
        if let Some(engine) = self.engine.as_deref_mut() {
            if let Err(e) = engine.execute_script(&exit_control_visibility(visible)) {
                tracing::warn!(error = %e, "could not update exit control");
            }
        }
    }

    fn on_message(&mut self, body: &str, now: Instant) -> Result<Flow, SessionError> {
        match InboundMessage::parse(body) {
            InboundMessage::PullToRefresh => {
                let engine = self.engine.as_deref_mut().ok_or(SessionError::NoEngine)?;
                self.reload.on_trigger(
                    now,
                    &self.snapshot.current_address,
                    engine,
                    self.prompt.as_mut(),
                    self.context.as_ref(),
                )?;
            }
            InboundMessage::ShowKeyboard => {
                self.keyboard.on_request(now, self.context.as_ref());
            }
            InboundMessage::Exit => {
                if self.config.allow_exit && self.exit_visible {
                    tracing::info!("manual exit requested");
                    return Ok(Flow::ManualExit);
                }
                tracing::warn!("exit requested while exit control is hidden");
            }
            InboundMessage::Console { level, text, raw } => {
                if self.config.log_console_messages {
                    console::log_message(level, text, raw);
                }
            }
            InboundMessage::Unknown(body) => tracing::debug!(body, "Unknown message ignored"),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::page_scripts::exit_control_visibility;
    use crate::prompt::ReloadChoice;
    use crate::reload::{BLANK_PAGE, RELOAD_CHECK_DELAY};
    use crate::testing::{EngineCall, FakeContext, FakeEngine, FakeKeyboardHost, FakePrompt, HostCall};

    struct Harness {
        controller: SessionController,
        engine: FakeEngine,
        prompt: FakePrompt,
        context: FakeContext,
        host: FakeKeyboardHost,
    }

    fn worker() -> WorkerConfig {
        let mut config = WorkerConfig::new(0, "https://a/");
        config.allow_exit = true;
        config
    }

    fn harness(config: WorkerConfig) -> Harness {
        let prompt = FakePrompt::default();
        let context = FakeContext::default();
        let host = FakeKeyboardHost::with_launchable(["/kb/primary"]);
        let keyboard = KeyboardConfig {
            primary: vec![PathBuf::from("/kb/primary")],
            secondary: PathBuf::from("/kb/secondary"),
        };
        let controller = SessionController::new(
            config,
            keyboard,
            SessionDeps {
                prompt: Box::new(prompt.clone()),
                context: Box::new(context.clone()),
                keyboard: Box::new(host.clone()),
            },
        );
        Harness {
            controller,
            engine: FakeEngine::default(),
            prompt,
            context,
            host,
        }
    }

    fn active(config: WorkerConfig) -> Harness {
        let mut h = harness(config);
        h.controller.activate(Box::new(h.engine.clone())).unwrap();
        h
    }

    fn address(url: &str) -> SessionEvent {
        EngineEvent::AddressChanged { url: url.into() }.into()
    }

    fn message(body: &str) -> SessionEvent {
        EngineEvent::Message { body: body.into() }.into()
    }

    // -- lifecycle --

    #[test]
    fn activation_moves_to_active() {
        let mut h = harness(worker());
        assert_eq!(h.controller.state(), SessionState::Starting);
        h.controller.activate(Box::new(h.engine.clone())).unwrap();
        assert_eq!(h.controller.state(), SessionState::Active);
        assert!(h.engine.calls().is_empty());
    }

    #[test]
    fn dev_tools_open_on_activation_when_configured() {
        let mut config = worker();
        config.dev_tools_on_start = true;
        let h = active(config);
        assert_eq!(h.engine.calls(), vec![EngineCall::DevTools]);
    }

    #[test]
    fn second_activation_is_rejected() {
        let mut h = active(worker());
        let err = h.controller.activate(Box::new(FakeEngine::default())).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                from: SessionState::Active,
                to: SessionState::Active
            }
        ));
    }

    #[test]
    fn aborted_start_is_terminal() {
        let mut h = harness(worker());
        h.controller.abort_start("no display 3");
        assert_eq!(h.controller.state(), SessionState::ShuttingDown);
        assert!(h.controller.activate(Box::new(h.engine.clone())).is_err());
        assert!(h.prompt.errors().is_empty());
    }

    #[test]
    fn events_before_activation_are_ignored() {
        let mut h = harness(worker());
        let flow = h.controller.dispatch(address("https://a/"), Instant::now());
        assert_eq!(flow, Flow::Continue);
        assert_eq!(h.controller.snapshot().current_address, "");
    }

    #[test]
    fn explicit_shutdown_stops_engine_calls() {
        let mut h = active(worker());
        h.controller.shutdown();
        let flow = h.controller.dispatch(address("https://a/"), Instant::now());
        assert_eq!(flow, Flow::Shutdown);
        assert!(h.engine.calls().is_empty());
    }

    // -- document scripts --

    #[test]
    fn seed_script_comes_first() {
        let mut config = worker();
        config.log_console_messages = true;
        config.local_storage.insert("a".into(), serde_json::json!("x'y"));
        let h = harness(config);

        let scripts = h.controller.document_scripts();
        assert!(scripts[0].contains(r#"localStorage.setItem('a', '"x\'y"');"#));
        assert_eq!(scripts[1], CONSOLE_CAPTURE_SCRIPT);
        assert_eq!(scripts.len(), 5);
    }

    #[test]
    fn console_capture_only_when_enabled() {
        let h = harness(worker());
        let scripts = h.controller.document_scripts();
        assert!(!scripts.iter().any(|s| s == CONSOLE_CAPTURE_SCRIPT));
        assert!(!scripts.iter().any(|s| s.contains("localStorage")));
        assert_eq!(scripts.len(), 3);
    }

    // -- exit control --

    #[test]
    fn exit_control_follows_address() {
        let mut h = active(worker());
        let now = Instant::now();

        h.controller.dispatch(address("https://a/"), now);
        assert!(h.controller.exit_visible());
        h.controller.dispatch(address("https://a/page"), now);
        assert!(!h.controller.exit_visible());

        assert_eq!(
            h.engine.scripts(),
            vec![exit_control_visibility(true), exit_control_visibility(false)]
        );
    }

    #[test]
    fn exit_control_stays_hidden_without_allow_exit() {
        let mut config = worker();
        config.allow_exit = false;
        let mut h = active(config);

        h.controller.dispatch(address("https://a/"), Instant::now());

        assert!(!h.controller.exit_visible());
        assert_eq!(h.engine.scripts(), vec![exit_control_visibility(false)]);
    }

    #[test]
    fn every_navigation_event_updates_snapshot() {
        let mut h = active(worker());
        let now = Instant::now();

        h.controller.dispatch(
            EngineEvent::NavigationStarting { url: "https://a/one".into() }.into(),
            now,
        );
        assert_eq!(h.controller.snapshot().current_address, "https://a/one");
        h.controller.dispatch(
            EngineEvent::NavigationCompleted { url: "https://a/".into() }.into(),
            now,
        );
        assert_eq!(h.controller.snapshot().current_address, "https://a/");
        assert!(h.controller.exit_visible());
    }

    #[test]
    fn blank_event_address_falls_back_to_engine() {
        let mut h = active(worker());
        h.engine.set_url("https://a/");

        h.controller.dispatch(address(""), Instant::now());

        assert_eq!(h.controller.snapshot().current_address, "https://a/");
    }

    #[test]
    fn exit_message_honored_only_when_visible() {
        let mut h = active(worker());
        let now = Instant::now();

        h.controller.dispatch(address("https://a/page"), now);
        assert_eq!(h.controller.dispatch(message("EXIT_KIOSK"), now), Flow::Continue);

        h.controller.dispatch(address("https://a/"), now);
        assert_eq!(h.controller.dispatch(message("EXIT_KIOSK"), now), Flow::ManualExit);
        assert_eq!(h.controller.state(), SessionState::ShuttingDown);
    }

    // -- reload --

    #[test]
    fn pull_to_refresh_runs_reload_protocol() {
        let mut h = active(worker());
        let now = Instant::now();
        h.controller.dispatch(address("https://a/"), now);
        h.engine.clear();
        h.prompt.push(ReloadChoice::Refresh);

        h.controller.dispatch(message("PULL_TO_REFRESH"), now);
        assert_eq!(h.engine.calls(), vec![EngineCall::Reload]);
        let posted = h.context.take();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, RELOAD_CHECK_DELAY);

        // No navigation-starting arrived: the check forces the fallback.
        h.controller.dispatch(posted[0].1.clone().into(), now + RELOAD_CHECK_DELAY);
        assert_eq!(h.engine.navigations(), vec![BLANK_PAGE.to_string()]);

        let restore = h.context.take();
        h.controller.dispatch(restore[0].1.clone().into(), now + Duration::from_secs(1));
        let navigations = h.engine.navigations();
        assert!(navigations[1].starts_with("https://a/?_ts="), "{navigations:?}");
    }

    #[test]
    fn observed_navigation_cancels_fallback() {
        let mut h = active(worker());
        let now = Instant::now();
        h.controller.dispatch(address("https://a/"), now);
        h.prompt.push(ReloadChoice::Refresh);
        h.controller.dispatch(message("PULL_TO_REFRESH"), now);
        let check = h.context.take().remove(0).1;
        h.engine.clear();

        h.controller.dispatch(
            EngineEvent::NavigationStarting { url: "https://a/".into() }.into(),
            now,
        );
        h.controller.dispatch(check.into(), now + RELOAD_CHECK_DELAY);

        assert!(h.engine.navigations().is_empty());
    }

    #[test]
    fn repeated_pulls_prompt_once() {
        let mut h = active(worker());
        let t0 = Instant::now();

        h.controller.dispatch(message("PULL_TO_REFRESH"), t0);
        h.controller.dispatch(message("PULL_TO_REFRESH"), t0 + Duration::from_millis(100));

        assert_eq!(h.prompt.asked(), 1);
    }

    #[test]
    fn prompt_failure_ends_session() {
        let mut config = worker();
        config.log_console_messages = true;
        let mut h = active(config);
        h.controller.dispatch(address("https://a/"), Instant::now());
        h.engine.clear();
        // The fake answers Cancel when empty, so fail through an Err answer.
        let failing = FakePrompt::failing("no dialog backend");
        h.controller.prompt = Box::new(failing.clone());

        let flow = h.controller.dispatch(message("PULL_TO_REFRESH"), Instant::now());

        assert_eq!(flow, Flow::Shutdown);
        assert_eq!(h.controller.state(), SessionState::ShuttingDown);
        assert_eq!(failing.errors().len(), 1);

        // Terminal: later events touch nothing.
        let flow = h.controller.dispatch(address("https://a/"), Instant::now());
        assert_eq!(flow, Flow::Shutdown);
        assert!(h.engine.calls().is_empty());
    }

    // -- keyboard and console --

    #[test]
    fn show_osk_launches_keyboard() {
        let mut h = active(worker());
        h.controller.dispatch(message("SHOW_OSK"), Instant::now());

        assert_eq!(h.host.calls(), vec![HostCall::Launch(PathBuf::from("/kb/primary"))]);
        let posted = h.context.take();
        assert_eq!(posted[0].1, DeferredAction::KeyboardCheck { generation: 1 });

        h.controller.dispatch(posted[0].1.clone().into(), Instant::now());
        assert!(h
            .host
            .calls()
            .contains(&HostCall::Launch(PathBuf::from("/kb/secondary"))));
    }

    #[test]
    fn console_and_unknown_messages_continue() {
        let mut config = worker();
        config.log_console_messages = true;
        let mut h = active(config);
        let now = Instant::now();

        assert_eq!(h.controller.dispatch(message("ERROR: it broke"), now), Flow::Continue);
        assert_eq!(h.controller.dispatch(message("LOG: x"), now), Flow::Continue);
        assert_eq!(h.controller.dispatch(message("whatever"), now), Flow::Continue);
        assert!(h.engine.calls().is_empty());
    }
}
