use serde::{Deserialize, Serialize};

/// State of a cancellable operation.
///
/// `Pending` is the only non-terminal state. Terminal states are mutually
/// exclusive and final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationState {
    /// Work is running and no cancellation source has fired.
    Pending,
    /// Work delivered its result first.
    Completed,
    /// Explicit cancellation won the race.
    Cancelled,
    /// Deadline or timeout elapsed first.
    TimedOut,
}

impl OperationState {
    /// Returns `true` if the operation reached a final state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationState::Pending)
    }

    /// Checks whether a transition from `self` to `next` is allowed.
    pub fn can_transition(&self, next: OperationState) -> bool {
        matches!(self, OperationState::Pending) && next.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationState::Pending => "pending",
            OperationState::Completed => "completed",
            OperationState::Cancelled => "cancelled",
            OperationState::TimedOut => "timedOut",
        }
    }
}
