pub mod errors;

pub use errors::{ConfigError, KioskError, PlatformError};

pub type Result<T> = std::result::Result<T, KioskError>;
