use std::sync::Arc;

use wry::raw_window_handle;
use wry::{WebView, WebViewBuilder};

use kiosk_session::{Engine, EngineError};

use crate::capabilities::EngineCapabilities;
use crate::events::EventSink;
use crate::handlers;
use crate::settings::WebViewSettings;

/// A full-window wry WebView driven by a kiosk session.
pub struct WryEngine {
    webview: WebView,
    monitor: u32,
    /// Last address we navigated to (fallback when the engine can't say).
    current_url: String,
    capabilities: EngineCapabilities,
}

impl WryEngine {
    /// Create the WebView filling `window`. It follows the window's size.
    ///
    /// Document scripts and event handlers are registered before the first
    /// navigation, so nothing on the initial page runs ahead of them.
    pub fn build<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        mut settings: WebViewSettings,
        sink: EventSink,
    ) -> Result<Self, EngineError> {
        let capabilities = EngineCapabilities::detect();
        for note in capabilities.negotiate(&mut settings) {
            tracing::info!(monitor = settings.monitor, "{note}");
        }
        let monitor = settings.monitor;

        let mut builder = WebViewBuilder::new()
            .with_devtools(settings.devtools)
            .with_autoplay(settings.autoplay)
            .with_back_forward_navigation_gestures(settings.swipe_navigation)
            .with_focused(true);

        for script in &settings.document_scripts {
            builder = builder.with_initialization_script(script);
        }

        builder = handlers::attach_ipc_handler(builder, Arc::clone(&sink), monitor);
        builder = handlers::attach_page_load_handler(builder, Arc::clone(&sink), monitor);
        builder = handlers::attach_navigation_handler(builder, Arc::clone(&sink), monitor);
        builder = handlers::attach_new_window_handler(builder, monitor);

        let webview = builder
            .with_url(&settings.url)
            .build(window)
            .map_err(|e| EngineError::Init(e.to_string()))?;

        tracing::info!(
            monitor,
            url = %settings.url,
            engine = capabilities.version.as_deref().unwrap_or("unknown"),
            scripts = settings.document_scripts.len(),
            "WebView created"
        );

        Ok(Self {
            webview,
            monitor,
            current_url: settings.url,
            capabilities,
        })
    }

    pub fn capabilities(&self) -> &EngineCapabilities {
        &self.capabilities
    }
}

impl Engine for WryEngine {
    fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.webview
            .load_url(url)
            .map_err(|e| EngineError::Navigate {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        self.current_url = url.to_string();
        Ok(())
    }

    fn execute_script(&mut self, script: &str) -> Result<(), EngineError> {
        self.webview
            .evaluate_script(script)
            .map_err(|e| EngineError::Script(e.to_string()))
    }

    fn reload(&mut self) -> Result<(), EngineError> {
        self.execute_script("window.location.reload();")
    }

    fn current_url(&self) -> Option<String> {
        match self.webview.url() {
            Ok(url) if !url.is_empty() => Some(url),
            _ => Some(self.current_url.clone()),
        }
    }

    fn open_dev_tools(&mut self) {
        #[cfg(any(debug_assertions, feature = "devtools"))]
        if self.capabilities.devtools {
            self.webview.open_devtools();
            return;
        }
        tracing::warn!(monitor = self.monitor, "developer tools unavailable");
    }
}
