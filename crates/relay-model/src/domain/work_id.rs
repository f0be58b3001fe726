use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a unit of work.
///
/// Producers are usually numbered, but named work is just as common in
/// callers, so both forms are accepted. Serialized untagged: `3` or `"sync"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkId {
    /// Numeric identifier (worker index, sequence number).
    Num(u64),
    /// Named identifier.
    Name(String),
}

impl WorkId {
    /// Returns the numeric form, if any.
    pub fn as_num(&self) -> Option<u64> {
        match self {
            WorkId::Num(n) => Some(*n),
            WorkId::Name(_) => None,
        }
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkId::Num(n) => write!(f, "{n}"),
            WorkId::Name(s) => f.write_str(s),
        }
    }
}

impl From<u64> for WorkId {
    fn from(n: u64) -> Self {
        WorkId::Num(n)
    }
}

impl From<usize> for WorkId {
    fn from(n: usize) -> Self {
        WorkId::Num(n as u64)
    }
}

impl From<&str> for WorkId {
    fn from(s: &str) -> Self {
        WorkId::Name(s.to_string())
    }
}

impl From<String> for WorkId {
    fn from(s: String) -> Self {
        WorkId::Name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_both_forms() {
        assert_eq!(WorkId::from(7u64).to_string(), "7");
        assert_eq!(WorkId::from("sync").to_string(), "sync");
    }

    #[test]
    fn serde_untagged() {
        assert_eq!(serde_json::to_string(&WorkId::Num(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&WorkId::from("job")).unwrap(),
            r#""job""#
        );

        let back: WorkId = serde_json::from_str("42").unwrap();
        assert_eq!(back, WorkId::Num(42));
        assert_eq!(back.as_num(), Some(42));
    }
}
