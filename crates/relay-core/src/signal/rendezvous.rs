use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::trace;

use crate::error::CoreError;

struct Envelope<T> {
    value: T,
    ack: oneshot::Sender<()>,
}

/// Receiving side of a zero-buffer channel.
///
/// Each delivered value is acknowledged before [`Rendezvous::recv`] returns,
/// which is what lets the sender resume.
pub struct Rendezvous<T> {
    rx: mpsc::Receiver<Envelope<T>>,
}

/// Sending side of a zero-buffer channel.
pub struct RendezvousSender<T> {
    tx: mpsc::Sender<Envelope<T>>,
}

impl<T> Clone for RendezvousSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send> Rendezvous<T> {
    pub fn channel() -> (RendezvousSender<T>, Rendezvous<T>) {
        // One envelope may sit in the slot, but its sender stays parked on the ack.
        let (tx, rx) = mpsc::channel(1);
        (RendezvousSender { tx }, Rendezvous { rx })
    }

    /// Receive the next value; `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            let env = self.rx.recv().await?;
            if env.ack.send(()).is_ok() {
                return Some(env.value);
            }
            // Sender timed out after enqueueing; the value was never delivered.
            trace!("rendezvous sender gave up; skipping");
        }
    }

    /// Receive with a time limit. `Ok(None)` means the limit elapsed.
    pub async fn recv_timeout(&mut self, limit: Duration) -> Result<Option<T>, CoreError> {
        match tokio::time::timeout(limit, self.recv()).await {
            Ok(Some(v)) => Ok(Some(v)),
            Ok(None) => Err(CoreError::Closed),
            Err(_) => Ok(None),
        }
    }

    /// Stop accepting values. Senders blocked on this channel fail with [`CoreError::Closed`].
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl<T: Send> RendezvousSender<T> {
    /// Hand `value` to a receiver, returning only once it has been taken.
    pub async fn send(&self, value: T) -> Result<(), CoreError> {
        let (ack, taken) = oneshot::channel();
        self.tx
            .send(Envelope { value, ack })
            .await
            .map_err(|_| CoreError::Closed)?;
        taken.await.map_err(|_| CoreError::Closed)
    }

    /// Like [`send`](Self::send) but gives up after `limit`.
    ///
    /// Returns `Ok(true)` if delivered, `Ok(false)` if the limit elapsed. A
    /// send that timed out is never observed by the receiver.
    pub async fn send_timeout(&self, value: T, limit: Duration) -> Result<bool, CoreError> {
        let (ack, mut taken) = oneshot::channel();
        let sleep = tokio::time::sleep(limit);
        tokio::pin!(sleep);

        tokio::select! {
            res = self.tx.send(Envelope { value, ack }) => res.map_err(|_| CoreError::Closed)?,
            _ = &mut sleep => return Ok(false),
        }

        tokio::select! {
            biased;
            res = &mut taken => res.map(|()| true).map_err(|_| CoreError::Closed),
            _ = &mut sleep => {
                // Closing first makes the receiver's ack fail; a racing ack that
                // already landed is still honoured.
                taken.close();
                Ok(taken.try_recv().is_ok())
            }
        }
    }

    /// Drop this sender. The receiver sees `None` once all senders are closed.
    pub fn close(self) {}

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
