use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-screen keyboard helper locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Candidate paths for the primary helper, tried in order.
    pub primary: Vec<PathBuf>,
    /// The fallback helper, restored or relaunched when the primary fails.
    pub secondary: PathBuf,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        #[cfg(windows)]
        {
            Self {
                primary: vec![
                    PathBuf::from(r"C:\Program Files\Common Files\microsoft shared\ink\TabTip.exe"),
                    PathBuf::from(
                        r"C:\Program Files (x86)\Common Files\microsoft shared\ink\TabTip.exe",
                    ),
                ],
                secondary: PathBuf::from(r"C:\Windows\System32\osk.exe"),
            }
        }
        #[cfg(not(windows))]
        {
            Self {
                primary: vec![
                    PathBuf::from("/usr/bin/squeekboard"),
                    PathBuf::from("/usr/local/bin/squeekboard"),
                ],
                secondary: PathBuf::from("/usr/bin/onboard"),
            }
        }
    }
}
