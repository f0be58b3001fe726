use serde::{Deserialize, Serialize};

use crate::{OpLabel, OperationError, WorkId};

/// Outcome of one unit of work.
///
/// Immutable once built: fields are private and only readable through
/// accessors. `error == None` is the single "no error" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkResult {
    id: WorkId,
    op: OpLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<OperationError>,
}

impl WorkResult {
    /// Successful result.
    pub fn ok(id: impl Into<WorkId>, op: impl Into<OpLabel>) -> Self {
        Self {
            id: id.into(),
            op: op.into(),
            error: None,
        }
    }

    /// Failed result.
    pub fn failed(id: impl Into<WorkId>, op: impl Into<OpLabel>, error: OperationError) -> Self {
        Self {
            id: id.into(),
            op: op.into(),
            error: Some(error),
        }
    }

    /// Build from a `Result`, keeping the error as data.
    pub fn from_result(
        id: impl Into<WorkId>,
        op: impl Into<OpLabel>,
        res: Result<(), OperationError>,
    ) -> Self {
        Self {
            id: id.into(),
            op: op.into(),
            error: res.err(),
        }
    }

    pub fn id(&self) -> &WorkId {
        &self.id
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn error(&self) -> Option<&OperationError> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// View as a `Result` so callers can use `?` on it.
    pub fn as_result(&self) -> Result<&Self, &OperationError> {
        match &self.error {
            None => Ok(self),
            Some(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_has_no_error() {
        let r = WorkResult::ok(1u64, "insert USERS value (1)");
        assert!(r.is_ok());
        assert!(r.error().is_none());
        assert!(r.as_result().is_ok());
        assert_eq!(r.op(), "insert USERS value (1)");
    }

    #[test]
    fn from_result_keeps_error() {
        let err = OperationError::rejected("insert 2", "TRANS");
        let r = WorkResult::from_result(2u64, "insert TRANS value (2)", Err(err.clone()));
        assert!(!r.is_ok());
        assert_eq!(r.error(), Some(&err));
        assert_eq!(r.as_result().unwrap_err(), &err);
    }

    #[test]
    fn serde_skips_missing_error() {
        let r = WorkResult::ok("sync", "noop");
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("error"));

        let back: WorkResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
