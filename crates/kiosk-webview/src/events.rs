//! Engine event plumbing.

use std::sync::Arc;

use kiosk_session::EngineEvent;

/// Where wry callbacks deliver events. Usually wraps an event loop proxy.
pub type EventSink = Arc<dyn Fn(EngineEvent) + Send + Sync>;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    /// The new document has been committed.
    Started,
    /// Page has fully loaded.
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

impl PageLoadState {
    /// A committed load changes the address; a finished one completes the
    /// navigation.
    pub fn into_event(self, url: String) -> EngineEvent {
        match self {
            PageLoadState::Started => EngineEvent::AddressChanged { url },
            PageLoadState::Finished => EngineEvent::NavigationCompleted { url },
        }
    }
}
