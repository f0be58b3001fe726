use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::{IntegrityError, integrity_violation};

/// Broadcast "done" signal owned by its creator.
///
/// Only the owner can close it; waiters are obtained with [`Signal::waiter`]
/// and can only observe. Every wait on a closed signal returns immediately.
#[derive(Debug, Default)]
pub struct Signal {
    token: CancellationToken,
    closed: AtomicBool,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Observer handle. Cheap to clone, cannot close the signal.
    pub fn waiter(&self) -> SignalWaiter {
        SignalWaiter {
            token: self.token.clone(),
        }
    }

    /// Close the signal, releasing every current and future waiter.
    ///
    /// Returns [`IntegrityError::SignalClosedTwice`] if it was already closed.
    pub fn try_close(&self) -> Result<(), IntegrityError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(IntegrityError::SignalClosedTwice);
        }
        self.token.cancel();
        debug!("signal closed");
        Ok(())
    }

    /// Close the signal. A second close aborts the task.
    #[track_caller]
    pub fn close(&self) {
        if let Err(err) = self.try_close() {
            integrity_violation(err);
        }
    }

    /// One-time close that tolerates repeated calls.
    ///
    /// Returns `true` only for the call that actually closed the signal.
    pub fn close_once(&self) -> bool {
        let closed = self.try_close().is_ok();
        if !closed {
            trace!("signal already closed; ignoring");
        }
        closed
    }

    pub fn is_fired(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Read-only side of a [`Signal`].
#[derive(Debug, Clone)]
pub struct SignalWaiter {
    token: CancellationToken,
}

impl SignalWaiter {
    /// Wait until the owning [`Signal`] is closed.
    pub async fn wait(&self) {
        self.token.cancelled().await
    }

    /// Non-blocking check, for cooperative checkpoints.
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token that is cancelled when this signal closes, for linking
    /// cancellation sources.
    pub(crate) fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}
