use thiserror::Error;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format `{0}` (expected text or json)")]
    UnknownFormat(String),
    #[error("invalid log directive `{directive}`: {reason}")]
    InvalidDirective { directive: String, reason: String },
    #[error("global subscriber is already installed")]
    AlreadyInstalled(#[source] TryInitError),
}
