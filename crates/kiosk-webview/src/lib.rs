//! `wry`-backed rendering engine for kiosk sessions.
//!
//! Builds one full-window WebView per worker, registers the session's
//! document scripts, and turns wry callbacks into
//! [`kiosk_session::EngineEvent`]s delivered through an [`EventSink`].

pub mod capabilities;
pub mod engine;
pub mod events;
pub mod handlers;
pub mod settings;

pub use capabilities::EngineCapabilities;
pub use engine::WryEngine;
pub use events::{EventSink, PageLoadState};
pub use settings::WebViewSettings;
