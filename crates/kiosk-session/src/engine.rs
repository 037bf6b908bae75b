//! The rendering-engine seam.

/// Errors raised by a rendering engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    Init(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigate { url: String, reason: String },

    #[error("script evaluation failed: {0}")]
    Script(String),
}

/// What the session needs from an embedded browser engine.
pub trait Engine {
    fn navigate(&mut self, url: &str) -> Result<(), EngineError>;

    fn execute_script(&mut self, script: &str) -> Result<(), EngineError>;

    /// Reload the current document.
    fn reload(&mut self) -> Result<(), EngineError>;

    /// The engine's idea of the current address, if it has one.
    fn current_url(&self) -> Option<String>;

    fn open_dev_tools(&mut self) {}
}

/// Callbacks from the engine, delivered to the session one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    NavigationStarting { url: String },
    NavigationCompleted { url: String },
    AddressChanged { url: String },
    /// One string posted by page script over the message channel.
    Message { body: String },
}
