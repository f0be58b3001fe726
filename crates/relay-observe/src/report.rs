use relay_model::{ErrorKind, OperationState, WorkResult};
use tracing::{debug, error, info, warn};

#[inline]
pub fn message_for(state: OperationState) -> &'static str {
    match state {
        OperationState::Pending => "operation is still running",
        OperationState::Completed => "operation completed before its cancellation source",
        OperationState::Cancelled => "operation cancelled (explicitly or by parent)",
        OperationState::TimedOut => "operation exceeded its deadline",
    }
}

/// Log the resolution of a cancellable operation.
#[inline]
pub fn log_outcome(op: &str, state: OperationState) {
    let msg = message_for(state);

    match state {
        OperationState::Pending => debug!(op, "{msg}"),
        OperationState::Completed => info!(op, "{msg}"),
        OperationState::Cancelled => info!(op, "{msg}"),
        OperationState::TimedOut => warn!(op, "{msg}"),
    }
}

/// Log one collected result; failures are logged by kind.
#[inline]
pub fn log_result(r: &WorkResult) {
    let Some(err) = r.error() else {
        info!(id = %r.id(), op = r.op(), "work succeeded");
        return;
    };

    match err.kind() {
        ErrorKind::Interrupted => info!(id = %r.id(), op = r.op(), "work interrupted"),
        ErrorKind::Timeout | ErrorKind::Unavailable => {
            warn!(id = %r.id(), op = r.op(), error = %err, "work failed (transient)")
        }
        ErrorKind::Rejected | ErrorKind::Other => {
            error!(id = %r.id(), op = r.op(), error = %err, "work failed")
        }
    }
}
