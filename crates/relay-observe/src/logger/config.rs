use std::io::IsTerminal;

use crate::logger::{error::LoggerError, format::LoggerFormat, level::LoggerLevel};

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    /// Format from `RELAY_LOG_FORMAT`, level from `RUST_LOG` (`info` when unset).
    pub fn from_env() -> Result<Self, LoggerError> {
        Ok(Self {
            format: LoggerFormat::from_env()?,
            level: LoggerLevel::from_env_or("info")?,
            ..Default::default()
        })
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::default(),
            with_targets: true,
            use_color: std::io::stdout().is_terminal(),
        }
    }
}
