mod config;
mod error;
mod format;
mod level;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::{FORMAT_ENV, LoggerFormat};
pub use level::LoggerLevel;

/// Install the process-wide `tracing` subscriber. Fails if one is already set.
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::install(cfg)
}
