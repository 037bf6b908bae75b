use crate::controller::SessionState;
use crate::engine::EngineError;

/// Errors that end an active session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("confirmation prompt failed: {0}")]
    Prompt(String),

    #[error("cannot move session from {from} to {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    #[error("no engine attached")]
    NoEngine,
}
