use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use relay_model::{OperationError, OperationState};
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

use crate::signal::SignalWaiter;

/// Returned by cooperative checkpoints once cancellation was requested.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operation interrupted by cancellation")]
pub struct Interrupted;

impl From<Interrupted> for OperationError {
    fn from(_: Interrupted) -> Self {
        OperationError::Interrupted
    }
}

/// Handle given to work so it can observe cancellation.
///
/// Carries the source's deadline, so a timeout is observed here even when
/// nobody is polling [`CancelSource::expired`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|at| Instant::now() >= at)
    }

    /// Resolves once cancellation was requested or the deadline passed.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(at) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(at) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    /// Checkpoint between discrete steps of work.
    pub fn checkpoint(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            trace!("checkpoint hit after cancellation");
            return Err(Interrupted);
        }
        Ok(())
    }

    /// Sleep that wakes early when cancelled.
    pub async fn sleep(&self, period: Duration) -> Result<(), Interrupted> {
        tokio::select! {
            _ = tokio::time::sleep(period) => Ok(()),
            _ = self.cancelled() => Err(Interrupted),
        }
    }
}

/// Releases the associated [`CancelSource`] when dropped.
///
/// Not `Clone`: there is exactly one release per source.
#[must_use = "dropping the guard cancels the source immediately"]
#[derive(Debug)]
pub struct CancelGuard {
    _guard: DropGuard,
}

impl CancelGuard {
    /// Cancel now instead of at end of scope.
    pub fn cancel(self) {
        debug!("cancel requested");
    }
}

/// Source of a cancellation/timeout signal.
#[derive(Debug)]
pub struct CancelSource {
    token: CancellationToken,
    deadline: Option<Instant>,
    timed_out: AtomicBool,
}

impl CancelSource {
    /// Explicit cancellation only.
    pub fn new() -> (Self, CancelGuard) {
        Self::from_token(CancellationToken::new())
    }

    /// Cancelled after `period` elapses.
    ///
    /// No timer task is spawned: tokens handed out by [`Self::token`] check the
    /// deadline themselves, and [`Self::expired`] cancels the shared token once
    /// it observes the deadline.
    pub fn timeout(period: Duration) -> (Self, CancelGuard) {
        let (source, guard) = Self::new();
        (source.with_timeout(period), guard)
    }

    /// Cancelled when `at` is reached. Same timer semantics as [`Self::timeout`].
    pub fn until(at: Instant) -> (Self, CancelGuard) {
        let (source, guard) = Self::new();
        (source.with_deadline(at), guard)
    }

    /// Cancelled when `parent` fires, or explicitly.
    pub fn linked(parent: &SignalWaiter) -> (Self, CancelGuard) {
        Self::from_token(parent.child_token())
    }

    fn from_token(token: CancellationToken) -> (Self, CancelGuard) {
        let guard = CancelGuard {
            _guard: token.clone().drop_guard(),
        };
        let source = Self {
            token,
            deadline: None,
            timed_out: AtomicBool::new(false),
        };
        (source, guard)
    }

    /// Add a timeout; the earliest deadline wins.
    pub fn with_timeout(self, period: Duration) -> Self {
        self.with_deadline(Instant::now() + period)
    }

    /// Add a deadline; the earliest deadline wins.
    pub fn with_deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(at),
            None => at,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Token for the work. It sees the deadline set so far; tighten the
    /// deadline before handing tokens out.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            token: self.token.clone(),
            deadline: self.deadline,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token().is_cancelled()
    }

    /// Resolves when the source fires, reporting why.
    ///
    /// An elapsed deadline cancels the token too, so work holding a
    /// [`CancelToken`] observes timeouts the same way as explicit cancels.
    pub async fn expired(&self) -> OperationState {
        match self.deadline {
            Some(at) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => self.cause(),
                    _ = tokio::time::sleep_until(at) => {
                        self.timed_out.store(true, Ordering::Release);
                        self.token.cancel();
                        OperationState::TimedOut
                    }
                }
            }
            None => {
                self.token.cancelled().await;
                self.cause()
            }
        }
    }

    fn cause(&self) -> OperationState {
        if self.timed_out.load(Ordering::Acquire) {
            OperationState::TimedOut
        } else {
            OperationState::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;

    #[tokio::test]
    async fn guard_drop_cancels() {
        let (source, guard) = CancelSource::new();
        let token = source.token();
        assert!(token.checkpoint().is_ok());

        drop(guard);
        assert!(token.is_cancelled());
        assert_eq!(token.checkpoint(), Err(Interrupted));
        assert_eq!(source.expired().await, OperationState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fires_and_cancels_token() {
        let (source, _guard) = CancelSource::timeout(Duration::from_millis(50));
        let token = source.token();

        assert_eq!(source.expired().await, OperationState::TimedOut);
        assert!(token.is_cancelled());
        // Asking again keeps the first cause.
        assert_eq!(source.expired().await, OperationState::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn earliest_deadline_wins() {
        let start = Instant::now();
        let (source, _guard) = CancelSource::until(start + Duration::from_millis(150));
        let source = source.with_timeout(Duration::from_millis(20));

        assert_eq!(source.deadline(), Some(start + Duration::from_millis(20)));
        assert_eq!(source.expired().await, OperationState::TimedOut);
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn token_sees_timeout_without_expired() {
        let (source, _guard) = CancelSource::timeout(Duration::from_millis(50));
        let token = source.token();
        assert!(token.checkpoint().is_ok());

        let worker = tokio::spawn(async move {
            let slept = token.sleep(Duration::from_secs(60)).await;
            (slept, token.checkpoint())
        });
        let (slept, checkpoint) = worker.await.unwrap();

        assert_eq!(slept, Err(Interrupted));
        assert_eq!(checkpoint, Err(Interrupted));
        assert!(source.is_cancelled());
    }

    #[tokio::test]
    async fn linked_to_signal() {
        let signal = Signal::new();
        let (source, _guard) = CancelSource::linked(&signal.waiter());
        assert!(!source.is_cancelled());

        signal.close();
        assert_eq!(source.expired().await, OperationState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn token_sleep_wakes_on_cancel() {
        let (source, guard) = CancelSource::new();
        let token = source.token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            guard.cancel();
        });

        let res = token.sleep(Duration::from_secs(60)).await;
        assert_eq!(res, Err(Interrupted));
    }

    #[test]
    fn interrupted_maps_to_operation_error() {
        let err: OperationError = Interrupted.into();
        assert_eq!(err, OperationError::Interrupted);
    }
}
