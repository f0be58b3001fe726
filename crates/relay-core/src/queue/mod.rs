//! Fixed-capacity admission queue that drops instead of blocking.
//!
//! The capacity bounds the worst-case backlog and is the only knob trading
//! latency against drops; size it from measured consumer throughput.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, trace};

use crate::MAX_CHANNEL_CAPACITY;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropQueueConfig {
    pub capacity: usize,
}

impl Default for DropQueueConfig {
    fn default() -> Self {
        Self { capacity: 5 }
    }
}

/// Accepted/dropped counters of one queue, readable from either side.
#[derive(Debug, Default)]
pub struct QueueStats {
    accepted: AtomicU64,
    dropped: AtomicU64,
}

impl QueueStats {
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Create a drop queue. The sender is the single owner allowed to close it.
pub fn drop_queue<T>(cfg: DropQueueConfig) -> Result<(DropSender<T>, DropReceiver<T>), CoreError> {
    if cfg.capacity == 0 || cfg.capacity > MAX_CHANNEL_CAPACITY {
        return Err(CoreError::InvalidConfig(format!(
            "drop queue capacity must be in 1..={MAX_CHANNEL_CAPACITY}, got {}",
            cfg.capacity
        )));
    }
    let (tx, rx) = mpsc::channel(cfg.capacity);
    let stats = Arc::new(QueueStats::default());

    Ok((
        DropSender {
            tx,
            stats: Arc::clone(&stats),
        },
        DropReceiver { rx, stats },
    ))
}

/// Producer side. Never blocks.
#[derive(Debug)]
pub struct DropSender<T> {
    tx: mpsc::Sender<T>,
    stats: Arc<QueueStats>,
}

impl<T> DropSender<T> {
    /// Enqueue if there is room. Returns `false` if the item was dropped
    /// because the queue is full or the consumer is gone.
    pub fn try_send(&self, item: T) -> bool {
        match self.tx.try_send(item) {
            Ok(()) => {
                self.stats.accepted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                trace!("queue full; item dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                trace!("consumer gone; item dropped");
                false
            }
        }
    }

    /// Signal that no more items will be sent. The consumer finishes once the
    /// buffer drains.
    pub fn close(self) {
        debug!(
            accepted = self.stats.accepted(),
            dropped = self.stats.dropped(),
            "drop queue closed"
        );
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Items currently buffered.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

/// Consumer side.
#[derive(Debug)]
pub struct DropReceiver<T> {
    rx: mpsc::Receiver<T>,
    stats: Arc<QueueStats>,
}

impl<T> DropReceiver<T> {
    /// Next accepted item in send order; `None` after close and drain.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Turn the receiver into a lazy stream of accepted items.
    ///
    /// Finite once the sender closes, pending otherwise. Consumes the
    /// receiver, so it cannot be restarted.
    pub fn consume(self) -> impl Stream<Item = T> {
        ReceiverStream::new(self.rx)
    }

    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }
}
