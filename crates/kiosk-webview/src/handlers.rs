use tracing::{debug, warn};
use wry::WebViewBuilder;

use kiosk_session::EngineEvent;

use crate::events::{EventSink, PageLoadState};

// =============================================================================
// MESSAGE FILTER
// =============================================================================

/// Longest message body accepted from page script.
pub const MAX_MESSAGE_LEN: usize = 64 * 1024;

/// Whether a message body from page script is forwarded to the session.
pub fn accept_message(body: &str) -> bool {
    !body.is_empty() && body.len() <= MAX_MESSAGE_LEN
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

pub(crate) fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    sink: EventSink,
    monitor: u32,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body();
        if !accept_message(body) {
            warn!(monitor, body_len = body.len(), "message from page rejected");
            return;
        }
        debug!(monitor, body_len = body.len(), "message from page");
        sink(EngineEvent::Message { body: body.clone() });
    })
}

pub(crate) fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    sink: EventSink,
    monitor: u32,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(monitor, ?state, url = %url, "page load");
        sink(state.into_event(url));
    })
}

/// Every navigation is allowed; the session only needs to see it start.
pub(crate) fn attach_navigation_handler<'a>(
    builder: WebViewBuilder<'a>,
    sink: EventSink,
    monitor: u32,
) -> WebViewBuilder<'a> {
    builder.with_navigation_handler(move |url| {
        debug!(monitor, url = %url, "navigation starting");
        sink(EngineEvent::NavigationStarting { url });
        true
    })
}

/// Pop-ups would open outside the kiosk window.
pub(crate) fn attach_new_window_handler<'a>(
    builder: WebViewBuilder<'a>,
    monitor: u32,
) -> WebViewBuilder<'a> {
    builder.with_new_window_req_handler(move |url| {
        warn!(monitor, url = %url, "new window blocked");
        false
    })
}

// =============================================================================
// TESTS
// =============================================================================
