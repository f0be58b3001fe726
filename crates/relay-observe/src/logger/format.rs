use std::str::FromStr;

use crate::logger::error::LoggerError;

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "RELAY_LOG_FORMAT";

/// Output encoding of log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggerFormat {
    /// Human-readable lines, colored on a terminal.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

impl LoggerFormat {
    /// Format from [`FORMAT_ENV`], `Text` when unset or blank.
    pub fn from_env() -> Result<Self, LoggerError> {
        match std::env::var(FORMAT_ENV) {
            Ok(v) if !v.trim().is_empty() => v.parse(),
            _ => Ok(Self::default()),
        }
    }
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LoggerFormat::Text),
            "json" => Ok(LoggerFormat::Json),
            _ => Err(LoggerError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!(" Text ".parse::<LoggerFormat>().unwrap(), LoggerFormat::Text);
        assert_eq!("JSON".parse::<LoggerFormat>().unwrap(), LoggerFormat::Json);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "yaml".parse::<LoggerFormat>().unwrap_err();
        assert!(matches!(err, LoggerError::UnknownFormat(s) if s == "yaml"));
    }
}
