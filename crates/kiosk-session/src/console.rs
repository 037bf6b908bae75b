//! Page console forwarding.

use std::fmt;

/// Messages at or under this many characters are not worth a log line.
pub const MIN_LOGGED_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
}

impl ConsoleLevel {
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "LOG" => Some(Self::Log),
            "INFO" => Some(Self::Info),
            "WARN" => Some(Self::Warn),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Log => "LOG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a forwarded console message should be logged at all.
pub fn should_log(raw: &str) -> bool {
    raw.chars().count() > MIN_LOGGED_LEN
}

/// Log a forwarded console message at the tracing level matching `level`.
/// Returns whether anything was logged.
pub fn log_message(level: ConsoleLevel, text: &str, raw: &str) -> bool {
    if !should_log(raw) {
        return false;
    }
    match level {
        ConsoleLevel::Error => tracing::error!(target: "kiosk::console", "{text}"),
        ConsoleLevel::Warn => tracing::warn!(target: "kiosk::console", "{text}"),
        ConsoleLevel::Info | ConsoleLevel::Log => {
            tracing::info!(target: "kiosk::console", level = %level, "{text}")
        }
    }
    true
}

/// Document-created script that forwards `console.error/warn/info/log`.
///
/// `console.debug` is left alone. Empty output, the literal `undefined`, and
/// anything mentioning `Trace:` or `Debug:` is dropped page-side.
pub const CONSOLE_CAPTURE_SCRIPT: &str = r#"
(function () {
    if (window.__kioskConsoleHooked) { return; }
    window.__kioskConsoleHooked = true;

    function serialize(value) {
        if (value === undefined) { return 'undefined'; }
        if (value === null) { return 'null'; }
        if (value instanceof Error) {
            return value.message + (value.stack ? '\n' + value.stack : '');
        }
        var type = typeof value;
        if (type === 'string') { return value; }
        if (type !== 'object') { return String(value); }
        try {
            var json = JSON.stringify(value);
            return json === undefined ? String(value) : json;
        } catch (e) {
            try { return String(value); } catch (e2) { return '[unserializable]'; }
        }
    }

    ['error', 'warn', 'info', 'log'].forEach(function (level) {
        var original = console[level];
        console[level] = function () {
            try {
                var text = Array.prototype.map.call(arguments, serialize).join(' ').trim();
                if (text && text !== 'undefined'
                    && text.indexOf('Trace:') < 0 && text.indexOf('Debug:') < 0) {
                    window.ipc.postMessage(level.toUpperCase() + ': ' + text);
                }
            } catch (e) {}
            if (original) { return original.apply(console, arguments); }
        };
    });
})();
"#;
