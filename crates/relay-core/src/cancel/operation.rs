use std::future::Future;

use relay_model::OperationState;
use tracing::{debug, instrument, trace};

use crate::cancel::source::{CancelSource, CancelToken};
use crate::error::CoreError;
use crate::signal::Buffered;

/// Terminal outcome of a [`CancellableOperation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Work finished first; carries its result.
    Completed(T),
    /// Explicit cancellation (or a linked parent) fired first.
    Cancelled,
    /// Deadline or timeout elapsed first.
    TimedOut,
}

impl<T> Outcome<T> {
    pub fn state(&self) -> OperationState {
        match self {
            Outcome::Completed(_) => OperationState::Completed,
            Outcome::Cancelled => OperationState::Cancelled,
            Outcome::TimedOut => OperationState::TimedOut,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Completed(v) => Some(v),
            Outcome::Cancelled | Outcome::TimedOut => None,
        }
    }
}

/// Races one unit of work against a [`CancelSource`].
#[derive(Debug, Clone)]
pub struct CancellableOperation {
    name: String,
}

impl CancellableOperation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start `work` and return as soon as either it delivers a result or
    /// `source` fires.
    ///
    /// The loser is never awaited. Work that loses keeps running until it
    /// observes its [`CancelToken`]; its late result lands in a single-slot
    /// buffer and is discarded, so the worker task never blocks.
    #[instrument(level = "debug", skip_all, fields(op = %self.name))]
    pub async fn run<T, F, Fut>(&self, source: &CancelSource, work: F) -> Result<Outcome<T>, CoreError>
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, mut rx) = Buffered::channel();
        let fut = work(source.token());
        let name = self.name.clone();

        tokio::spawn(async move {
            let value = fut.await;
            if tx.send_buffered(value).is_err() {
                trace!(op = %name, "late result discarded");
            }
        });

        let outcome = tokio::select! {
            biased;
            res = rx.recv() => match res {
                Ok(value) => Outcome::Completed(value),
                Err(_) => return Err(CoreError::WorkAborted),
            },
            state = source.expired() => match state {
                OperationState::TimedOut => Outcome::TimedOut,
                _ => Outcome::Cancelled,
            },
        };

        debug!(state = outcome.state().as_str(), "operation resolved");
        Ok(outcome)
    }
}
