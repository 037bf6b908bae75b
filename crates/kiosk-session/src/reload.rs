//! Pull-to-refresh: confirmation, reload, and the forced-reload fallback.
//!
//! Some engines accept a reload request and then never navigate (service
//! worker stalls, a document that swallows `beforeunload`). After a short
//! check the fallback goes through `about:blank` and back to the same
//! address with a cache-busting parameter.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use url::Url;

use crate::context::{DeferredAction, OwnerContext};
use crate::engine::Engine;
use crate::error::SessionError;
use crate::guard::{ConfirmationGate, DebounceGuard};
use crate::prompt::{ReloadChoice, UserPrompt};

pub const PULL_TO_REFRESH_DEBOUNCE: Duration = Duration::from_millis(800);
pub const RELOAD_CHECK_DELAY: Duration = Duration::from_millis(700);
pub const RESTORE_DELAY: Duration = Duration::from_millis(250);
pub const BLANK_PAGE: &str = "about:blank";
pub const CACHE_BUST_PARAM: &str = "_ts";

/// What became of one `PULL_TO_REFRESH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Debounced,
    PromptBusy,
    Chose(ReloadChoice),
}

#[derive(Debug)]
struct PendingReload {
    generation: u64,
    url: String,
    navigation_seen: bool,
}

pub struct ReloadProtocol {
    debounce: DebounceGuard,
    gate: ConfirmationGate,
    home_url: String,
    generation: u64,
    pending: Option<PendingReload>,
}

impl ReloadProtocol {
    pub fn new(home_url: impl Into<String>) -> Self {
        Self {
            debounce: DebounceGuard::new(PULL_TO_REFRESH_DEBOUNCE),
            gate: ConfirmationGate::new(),
            home_url: home_url.into(),
            generation: 0,
            pending: None,
        }
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// Whether a reload is waiting for its check.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle `PULL_TO_REFRESH`. Only a failing prompt is an error; the
    /// gate is released before this returns either way.
    pub fn on_trigger(
        &mut self,
        now: Instant,
        current_address: &str,
        engine: &mut dyn Engine,
        prompt: &mut dyn UserPrompt,
        ctx: &dyn OwnerContext,
    ) -> Result<TriggerOutcome, SessionError> {
        if !self.debounce.try_accept(now) {
            tracing::debug!("pull-to-refresh debounced");
            return Ok(TriggerOutcome::Debounced);
        }

        let choice = {
            let Some(_gate) = self.gate.try_open() else {
                tracing::debug!("refresh prompt already open");
                return Ok(TriggerOutcome::PromptBusy);
            };
            prompt.confirm_reload().map_err(SessionError::Prompt)?
        };

        match choice {
            ReloadChoice::Refresh => self.refresh(current_address, engine, ctx),
            ReloadChoice::Home => {
                tracing::info!(url = %self.home_url, "returning to start page");
                engine.navigate(&self.home_url)?;
            }
            ReloadChoice::Cancel => tracing::debug!("refresh cancelled"),
        }
        Ok(TriggerOutcome::Chose(choice))
    }

    fn refresh(&mut self, current_address: &str, engine: &mut dyn Engine, ctx: &dyn OwnerContext) {
        let url = if current_address.is_empty() {
            self.home_url.clone()
        } else {
            current_address.to_string()
        };
        self.generation += 1;
        tracing::info!(url = %url, generation = self.generation, "reloading");
        self.pending = Some(PendingReload {
            generation: self.generation,
            url,
            navigation_seen: false,
        });

        // A refused request is covered by the check.
        if let Err(e) = engine.reload() {
            tracing::warn!(error = %e, "reload request failed");
        }
        ctx.post_after(
            RELOAD_CHECK_DELAY,
            DeferredAction::ReloadCheck {
                generation: self.generation,
            },
        );
    }

    pub fn on_navigation_starting(&mut self) {
        if let Some(pending) = &mut self.pending {
            pending.navigation_seen = true;
        }
    }

    /// The reload check fired.
    pub fn on_check(&mut self, generation: u64, engine: &mut dyn Engine, ctx: &dyn OwnerContext) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if pending.generation != generation {
            tracing::debug!(generation, "stale reload check");
            self.pending = Some(pending);
            return;
        }
        if pending.navigation_seen {
            tracing::debug!(generation, "reload started normally");
            return;
        }

        tracing::warn!(url = %pending.url, "reload did not navigate, forcing through blank page");
        if let Err(e) = engine.navigate(BLANK_PAGE) {
            tracing::warn!(error = %e, "forced reload failed");
            return;
        }
        ctx.post_after(
            RESTORE_DELAY,
            DeferredAction::ReloadRestore {
                generation,
                url: cache_busted(&pending.url, unix_millis()),
            },
        );
    }

    /// Second half of the fallback. Skipped if another reload began since.
    pub fn on_restore(&mut self, generation: u64, url: &str, engine: &mut dyn Engine) {
        if generation != self.generation {
            tracing::debug!(generation, "stale reload restore");
            return;
        }
        if let Err(e) = engine.navigate(url) {
            tracing::warn!(url = %url, error = %e, "forced reload failed");
        }
    }
}

/// `url` with `_ts=<millis>` appended to its query.
pub fn cache_busted(url: &str, millis: u128) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if !parsed.cannot_be_a_base() => {
            parsed
                .query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &millis.to_string());
            parsed.to_string()
        }
        _ => {
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{url}{sep}{CACHE_BUST_PARAM}={millis}")
        }
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
