//! What the underlying engine can do on this platform.
//!
//! Settings the engine cannot honor are reported once at build time
//! instead of failing later at the call site.

use crate::settings::WebViewSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCapabilities {
    /// Engine version string, when the platform reports one.
    pub version: Option<String>,
    /// Whether back/forward swipe navigation can be switched off.
    pub swipe_navigation_control: bool,
    pub devtools: bool,
}

/// Debug builds always carry developer tools; release builds only with the
/// `devtools` feature.
fn devtools_available() -> bool {
    cfg!(any(debug_assertions, feature = "devtools"))
}

impl EngineCapabilities {
    pub fn detect() -> Self {
        Self {
            version: wry::webview_version().ok(),
            swipe_navigation_control: cfg!(any(
                target_os = "windows",
                target_os = "macos",
                target_os = "ios"
            )),
            devtools: devtools_available(),
        }
    }

    /// Adjust `settings` to what this engine supports. Returns a note for
    /// every request that cannot be honored.
    pub fn negotiate(&self, settings: &mut WebViewSettings) -> Vec<&'static str> {
        let mut notes = Vec::new();
        if !settings.swipe_navigation && !self.swipe_navigation_control {
            notes.push("swipe navigation cannot be disabled on this platform");
        }
        if settings.devtools && !self.devtools {
            settings.devtools = false;
            notes.push("developer tools are not available");
        }
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limited() -> EngineCapabilities {
        EngineCapabilities {
            version: None,
            swipe_navigation_control: false,
            devtools: false,
        }
    }

    #[test]
    fn full_support_changes_nothing() {
        let caps = EngineCapabilities {
            version: Some("1.0".into()),
            swipe_navigation_control: true,
            devtools: true,
        };
        let mut settings = WebViewSettings::new(0, "https://a/").with_devtools(true);
        assert!(caps.negotiate(&mut settings).is_empty());
        assert!(settings.devtools);
    }

    #[test]
    fn unsupported_devtools_are_dropped() {
        let mut settings = WebViewSettings::new(0, "https://a/").with_devtools(true);
        let notes = limited().negotiate(&mut settings);
        assert!(!settings.devtools);
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn devtools_request_follows_build_support() {
        let caps = EngineCapabilities {
            version: None,
            swipe_navigation_control: true,
            devtools: devtools_available(),
        };
        let mut settings = WebViewSettings::new(0, "https://a/").with_devtools(true);
        let notes = caps.negotiate(&mut settings);
        assert_eq!(settings.devtools, caps.devtools);
        assert_eq!(notes.is_empty(), caps.devtools);
    }

    #[cfg(feature = "devtools")]
    #[test]
    fn devtools_feature_makes_devtools_available() {
        assert!(devtools_available());
    }

    #[test]
    fn swipe_note_only_when_disabling() {
        let mut settings = WebViewSettings::new(0, "https://a/").with_devtools(false);
        settings.swipe_navigation = true;
        assert!(limited().negotiate(&mut settings).is_empty());
    }
}
