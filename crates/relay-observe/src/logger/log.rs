use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    Layer, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Install the global subscriber described by `cfg`.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let base = fmt::layer()
        .with_target(cfg.with_targets)
        .with_timer(local_timer());

    let output = match cfg.format {
        LoggerFormat::Text => base.with_ansi(cfg.use_color).boxed(),
        LoggerFormat::Json => base.json().with_ansi(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(cfg.level.filter())
        .with(output)
        .try_init()
        .map_err(LoggerError::AlreadyInstalled)
}

// Falls back to UTC when the local offset can't be determined (multi-threaded process).
fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_rejected() {
        let text = LoggerConfig::default();
        let json = LoggerConfig {
            format: LoggerFormat::Json,
            ..Default::default()
        };
        // Whichever runs first wins; the other must report the conflict.
        let _ = install(&text);
        assert!(matches!(install(&json), Err(LoggerError::AlreadyInstalled(_))));
    }
}
