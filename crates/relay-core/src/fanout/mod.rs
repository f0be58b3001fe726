//! Fan-out of a fixed number of producers into one pre-sized result channel.

use std::future::Future;
use std::sync::Arc;

use relay_model::WorkResult;
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace, warn};

use crate::MAX_CHANNEL_CAPACITY;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutConfig {
    /// Number of concurrent producers.
    pub workers: usize,
    /// Results each producer sends.
    pub ops_per_worker: usize,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            ops_per_worker: 2,
        }
    }
}

impl FanOutConfig {
    pub fn new(workers: usize, ops_per_worker: usize) -> Self {
        Self {
            workers,
            ops_per_worker,
        }
    }

    /// Total number of results a run produces.
    ///
    /// The result channel holds all of them at once, so the total is bounded
    /// by [`MAX_CHANNEL_CAPACITY`].
    pub fn total(&self) -> Result<usize, CoreError> {
        match self.workers.checked_mul(self.ops_per_worker) {
            Some(total) if total <= MAX_CHANNEL_CAPACITY => Ok(total),
            _ => Err(CoreError::InvalidConfig(format!(
                "{} workers x {} ops exceeds the channel limit of {MAX_CHANNEL_CAPACITY}",
                self.workers, self.ops_per_worker
            ))),
        }
    }
}

/// Runs producers and gathers every result exactly once.
///
/// The result channel is sized to the exact number of expected sends, so a
/// producer never waits on the collector. Results arrive in completion order.
#[derive(Debug, Clone, Default)]
pub struct FanOutCollector {
    cfg: FanOutConfig,
}

impl FanOutCollector {
    pub fn new(cfg: FanOutConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &FanOutConfig {
        &self.cfg
    }

    /// Start `workers` producers, each calling `op(worker, step)` for
    /// `ops_per_worker` steps, and collect all results.
    ///
    /// Failed operations are ordinary results. If a producer dies before
    /// sending all of its results the shortfall is reported as
    /// [`CoreError::ProducerLost`] instead of waiting forever.
    #[instrument(level = "debug", skip(self, op), fields(workers = self.cfg.workers, ops = self.cfg.ops_per_worker))]
    pub async fn run<F, Fut>(&self, op: F) -> Result<Vec<WorkResult>, CoreError>
    where
        F: Fn(usize, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = WorkResult> + Send + 'static,
    {
        let total = self.cfg.total()?;
        if total == 0 {
            debug!("nothing to run");
            return Ok(Vec::new());
        }

        let (tx, mut rx) = mpsc::channel::<WorkResult>(total);
        let op = Arc::new(op);
        let ops = self.cfg.ops_per_worker;

        for worker in 0..self.cfg.workers {
            let tx = tx.clone();
            let op = Arc::clone(&op);
            tokio::spawn(async move {
                for step in 0..ops {
                    let res = op(worker, step).await;
                    if tx.send(res).await.is_err() {
                        return;
                    }
                }
            });
        }
        drop(tx);

        let mut results = Vec::with_capacity(total);
        let mut remaining = total;
        while remaining > 0 {
            let Some(res) = rx.recv().await else {
                warn!(missing = remaining, "result channel closed early");
                return Err(CoreError::ProducerLost { missing: remaining });
            };
            trace!(remaining, id = %res.id(), op = res.op(), ok = res.is_ok(), "result received");
            results.push(res);
            remaining -= 1;
        }

        debug!(total, "all results collected");
        Ok(results)
    }
}

/// Summary over a collected batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub total: usize,
    pub failed: usize,
}

impl FanOutReport {
    pub fn from_results(results: &[WorkResult]) -> Self {
        Self {
            total: results.len(),
            failed: results.iter().filter(|r| !r.is_ok()).count(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.total - self.failed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use relay_model::{OperationError, WorkId};

    use super::*;

    fn label(worker: usize, step: usize) -> String {
        format!("op {step} for {worker}")
    }

    #[tokio::test]
    async fn returns_every_result() {
        for (w, o) in [(1, 1), (3, 4), (10, 2), (16, 1)] {
            let collector = FanOutCollector::new(FanOutConfig::new(w, o));
            let results = collector
                .run(|worker, step| async move { WorkResult::ok(worker, label(worker, step)) })
                .await
                .unwrap();

            assert_eq!(results.len(), w * o);

            // Any permutation is fine, but each (worker, step) exactly once.
            let seen: HashSet<_> = results
                .iter()
                .map(|r| (r.id().clone(), r.op().to_string()))
                .collect();
            assert_eq!(seen.len(), w * o);
            for worker in 0..w {
                for step in 0..o {
                    assert!(seen.contains(&(WorkId::from(worker), label(worker, step))));
                }
            }
        }
    }

    #[tokio::test]
    async fn failures_are_collected_like_successes() {
        let collector = FanOutCollector::new(FanOutConfig::new(4, 2));
        let results = collector
            .run(|worker, step| async move {
                if step == 1 {
                    WorkResult::failed(
                        worker,
                        "insert TRANS",
                        OperationError::rejected(format!("insert {worker}"), "TRANS"),
                    )
                } else {
                    WorkResult::ok(worker, "insert USERS")
                }
            })
            .await
            .unwrap();

        let report = FanOutReport::from_results(&results);
        assert_eq!(report.total, 8);
        assert_eq!(report.failed, 4);
        assert_eq!(report.succeeded(), 4);
    }

    #[tokio::test]
    async fn zero_work_is_empty() {
        let collector = FanOutCollector::new(FanOutConfig::new(0, 5));
        let results = collector
            .run(|w, _| async move { WorkResult::ok(w, "never") })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn overflowing_config_is_rejected() {
        let cfg = FanOutConfig::new(usize::MAX, 2);
        assert!(matches!(cfg.total(), Err(CoreError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected_before_spawning() {
        let collector = FanOutCollector::new(FanOutConfig::new(1, 1usize << 62));
        let res = collector
            .run(|w, _| async move { WorkResult::ok(w, "never") })
            .await;
        assert!(matches!(res, Err(CoreError::InvalidConfig(_))));

        assert_eq!(
            FanOutConfig::new(1, MAX_CHANNEL_CAPACITY).total().unwrap(),
            MAX_CHANNEL_CAPACITY
        );
    }

    #[tokio::test]
    async fn dead_producer_does_not_hang_collector() {
        let collector = FanOutCollector::new(FanOutConfig::new(3, 2));
        let res = tokio::time::timeout(
            Duration::from_secs(5),
            collector.run(|worker, step| async move {
                if worker == 1 && step == 1 {
                    panic!("producer crashed");
                }
                WorkResult::ok(worker, "op")
            }),
        )
        .await
        .expect("collector must not block");

        assert!(matches!(res, Err(CoreError::ProducerLost { missing: 1 })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn repeated_runs_never_deadlock() {
        let collector = FanOutCollector::new(FanOutConfig::new(10, 2));
        for _ in 0..1000 {
            let results = tokio::time::timeout(
                Duration::from_secs(5),
                collector.run(|worker, step| async move {
                    if step % 2 == 0 {
                        tokio::task::yield_now().await;
                    }
                    WorkResult::ok(worker, "insert")
                }),
            )
            .await
            .expect("run must finish")
            .unwrap();
            assert_eq!(results.len(), 20);
        }
    }
}
