use std::io;

use kiosk_common::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("worker binary not found: {0}")]
    BinaryNotFound(#[from] PlatformError),

    #[error("failed to start worker {monitor}: {source}")]
    Spawn { monitor: u32, source: io::Error },

    #[error("failed to wait for worker {monitor}: {source}")]
    Wait { monitor: u32, source: io::Error },
}
