use tracing_subscriber::EnvFilter;

use crate::logger::error::LoggerError;

/// Validated `EnvFilter` directive (`info`, `relay_core=debug,warn`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(directive: impl Into<String>) -> Result<Self, LoggerError> {
        let directive = directive.into();
        if let Err(e) = EnvFilter::try_new(&directive) {
            return Err(LoggerError::InvalidDirective {
                reason: e.to_string(),
                directive,
            });
        }
        Ok(Self(directive))
    }

    /// Level from `RUST_LOG`, falling back to `default` when unset.
    pub fn from_env_or(default: &str) -> Result<Self, LoggerError> {
        match std::env::var(EnvFilter::DEFAULT_ENV) {
            Ok(v) if !v.trim().is_empty() => Self::new(v),
            _ => Self::new(default),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directive was checked on construction, so building never drops parts of it.
    pub(crate) fn filter(&self) -> EnvFilter {
        EnvFilter::new(&self.0)
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_directives() {
        assert_eq!(LoggerLevel::new("debug").unwrap().as_str(), "debug");
        assert!(LoggerLevel::new("relay_core=trace,warn").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        let err = LoggerLevel::new("relay_core=loud").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidDirective { directive, .. } if directive == "relay_core=loud"));
    }

    #[test]
    fn filter_keeps_directive() {
        let level = LoggerLevel::new("relay_core=debug,warn").unwrap();
        let rendered = level.filter().to_string();
        assert!(rendered.contains("relay_core=debug"));
        assert!(rendered.contains("warn"));
    }
}
