use thiserror::Error;
use tracing::error;

/// Violated coordination invariant.
///
/// These are programmer errors: continuing after one risks corrupting the
/// coordination state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("signal closed twice")]
    SignalClosedTwice,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("integrity violation: {0}")]
    Integrity(#[from] IntegrityError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("{missing} result(s) never arrived: producer terminated early")]
    ProducerLost { missing: usize },
    #[error("work terminated without delivering a result")]
    WorkAborted,
    #[error("channel closed")]
    Closed,
}

/// Surface an integrity violation loudly and abort the current task.
///
/// Logged at error level first so the diagnostic survives `panic = "abort"`.
#[track_caller]
pub fn integrity_violation(err: IntegrityError) -> ! {
    let location = std::panic::Location::caller();
    error!(%err, %location, "coordination invariant violated");
    panic!("integrity violation: {err} at {location}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_wraps_into_core() {
        let err: CoreError = IntegrityError::SignalClosedTwice.into();
        assert!(matches!(
            err,
            CoreError::Integrity(IntegrityError::SignalClosedTwice)
        ));
        assert_eq!(err.to_string(), "integrity violation: signal closed twice");
    }

    #[test]
    #[should_panic(expected = "integrity violation: signal closed twice")]
    fn violation_panics() {
        integrity_violation(IntegrityError::SignalClosedTwice);
    }
}
