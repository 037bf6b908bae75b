/// How to build a worker's WebView.
#[derive(Debug, Clone)]
pub struct WebViewSettings {
    /// Display index, recorded on every log line from the handlers.
    pub monitor: u32,
    /// Initial address.
    pub url: String,
    /// Scripts run at document creation, before any page script, in order.
    pub document_scripts: Vec<String>,
    pub devtools: bool,
    /// Whether back/forward swipe gestures may navigate. Off for kiosks.
    pub swipe_navigation: bool,
    pub autoplay: bool,
}

impl WebViewSettings {
    pub fn new(monitor: u32, url: impl Into<String>) -> Self {
        Self {
            monitor,
            url: url.into(),
            document_scripts: Vec::new(),
            devtools: cfg!(debug_assertions),
            swipe_navigation: false,
            autoplay: true,
        }
    }

    pub fn with_document_scripts(mut self, scripts: Vec<String>) -> Self {
        self.document_scripts = scripts;
        self
    }

    pub fn with_devtools(mut self, devtools: bool) -> Self {
        self.devtools = devtools;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kiosk_defaults() {
        let settings = WebViewSettings::new(2, "https://a/");
        assert_eq!(settings.monitor, 2);
        assert!(!settings.swipe_navigation);
        assert!(settings.document_scripts.is_empty());
    }
}
