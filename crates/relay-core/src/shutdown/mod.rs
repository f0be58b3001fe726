//! Process-level graceful shutdown.
//!
//! A processor runs in the background while the control loop waits for one of:
//! - an interrupt: the top-level [`Signal`] is closed once and the processor is
//!   expected to notice it at its next checkpoint;
//! - the overall deadline: the loop gives up and reports it, the caller exits
//!   with a non-zero status;
//! - processor completion.

use std::future::Future;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::error::CoreError;
use crate::signal::{Signal, SignalWaiter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownConfig {
    /// Wall-clock limit for the whole run.
    pub deadline: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownOutcome<T> {
    /// The processor finished; `interrupted` tells whether shutdown was requested first.
    Completed { value: T, interrupted: bool },
    /// Nothing completed before the deadline.
    DeadlineExceeded,
}

/// Owner of the top-level shutdown signal.
#[derive(Debug)]
pub struct Shutdown {
    cfg: ShutdownConfig,
    signal: Signal,
}

impl Shutdown {
    pub fn new(cfg: ShutdownConfig) -> Self {
        Self {
            cfg,
            signal: Signal::new(),
        }
    }

    /// Handle for the processor to poll between steps.
    pub fn waiter(&self) -> SignalWaiter {
        self.signal.waiter()
    }

    /// Drive `processor` to completion, an interrupt, or the deadline.
    ///
    /// Only the first interrupt matters; after it the interrupt source is no
    /// longer polled. The processor is never aborted: if the deadline wins it
    /// is left to the caller's process exit.
    ///
    /// Consumes the controller, so the top-level signal is closed at most
    /// once. Take waiters with [`Self::waiter`] before calling.
    #[instrument(level = "debug", skip_all, fields(deadline_ms = self.cfg.deadline.as_millis() as u64))]
    pub async fn run<T, P, I>(self, processor: P, interrupt: I) -> Result<ShutdownOutcome<T>, CoreError>
    where
        P: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        I: Future<Output = ()>,
    {
        let mut handle = tokio::spawn(processor);
        let deadline = tokio::time::sleep(self.cfg.deadline);
        tokio::pin!(deadline);
        tokio::pin!(interrupt);
        let mut interrupted = false;

        loop {
            tokio::select! {
                _ = &mut interrupt, if !interrupted => {
                    info!("interrupt received; requesting shutdown");
                    self.signal.close();
                    interrupted = true;
                }
                _ = &mut deadline => {
                    error!("deadline exceeded; giving up");
                    return Ok(ShutdownOutcome::DeadlineExceeded);
                }
                res = &mut handle => {
                    return match res {
                        Ok(value) => {
                            info!(interrupted, "processor completed");
                            Ok(ShutdownOutcome::Completed { value, interrupted })
                        }
                        Err(e) => {
                            warn!(error = %e, "processor terminated abnormally");
                            Err(CoreError::WorkAborted)
                        }
                    };
                }
            }
        }
    }
}

/// Resolves on the first Ctrl+C. Never resolves if the handler can't be installed.
pub async fn os_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for interrupts");
        std::future::pending::<()>().await;
    }
}
