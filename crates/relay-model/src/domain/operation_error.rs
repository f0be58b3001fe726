use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single unit of work.
///
/// Carried as data inside [`crate::WorkResult`]; the coordination machinery
/// stays intact when an operation fails.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "detail")]
pub enum OperationError {
    /// The target refused the operation (constraint, validation, ...).
    #[error("unable to {action} into {target}")]
    Rejected { action: String, target: String },
    /// A dependency could not be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// The operation observed cancellation at a checkpoint and stopped early.
    #[error("interrupted: early shutdown")]
    Interrupted,
    /// The operation ran past its own time limit.
    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Discriminant of [`OperationError`], for exhaustive matching in policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Rejected,
    Unavailable,
    Interrupted,
    Timeout,
    Other,
}

impl OperationError {
    pub fn rejected(action: impl Into<String>, target: impl Into<String>) -> Self {
        OperationError::Rejected {
            action: action.into(),
            target: target.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OperationError::Rejected { .. } => ErrorKind::Rejected,
            OperationError::Unavailable(_) => ErrorKind::Unavailable,
            OperationError::Interrupted => ErrorKind::Interrupted,
            OperationError::Timeout { .. } => ErrorKind::Timeout,
            OperationError::Other(_) => ErrorKind::Other,
        }
    }

    /// Returns `true` if a caller-side retry could reasonably succeed.
    ///
    /// Only a hint; this crate never retries on its own.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Unavailable | ErrorKind::Timeout | ErrorKind::Interrupted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            OperationError::rejected("insert 3", "USERS").kind(),
            ErrorKind::Rejected
        );
        assert_eq!(OperationError::Interrupted.kind(), ErrorKind::Interrupted);
        assert_eq!(
            OperationError::Timeout { after_ms: 5 }.kind(),
            ErrorKind::Timeout
        );
    }

    #[test]
    fn transient_classification() {
        assert!(OperationError::Unavailable("db".into()).is_transient());
        assert!(!OperationError::rejected("insert 1", "TRANS").is_transient());
        assert!(!OperationError::Other("boom".into()).is_transient());
    }

    #[test]
    fn display_messages() {
        let e = OperationError::rejected("insert 4", "USERS");
        assert_eq!(e.to_string(), "unable to insert 4 into USERS");
        assert_eq!(
            OperationError::Timeout { after_ms: 50 }.to_string(),
            "timed out after 50ms"
        );
    }

    #[test]
    fn serde_tagged() {
        let e = OperationError::rejected("insert 1", "USERS");
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""kind":"rejected""#));

        let back: OperationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
