use tokio::sync::oneshot;
use tracing::trace;

use crate::error::CoreError;

/// Receiving side of a single-slot signal carrying one value.
pub struct Buffered<T> {
    rx: oneshot::Receiver<T>,
}

/// Sending side of a single-slot signal.
///
/// `send_buffered` consumes the sender, so the slot is always empty when it
/// is written and the send never blocks.
pub struct BufferedSender<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Buffered<T> {
    pub fn channel() -> (BufferedSender<T>, Buffered<T>) {
        let (tx, rx) = oneshot::channel();
        (BufferedSender { tx }, Buffered { rx })
    }

    /// Wait for the value. Fails with [`CoreError::Closed`] if the sender was
    /// dropped without sending.
    ///
    /// Cancel safe: dropping the future leaves the value in the slot.
    pub async fn recv(&mut self) -> Result<T, CoreError> {
        (&mut self.rx).await.map_err(|_| CoreError::Closed)
    }

    /// Non-blocking check. `Ok(None)` while the slot is still empty.
    pub fn try_recv(&mut self) -> Result<Option<T>, CoreError> {
        match self.rx.try_recv() {
            Ok(v) => Ok(Some(v)),
            Err(oneshot::error::TryRecvError::Empty) => Ok(None),
            Err(oneshot::error::TryRecvError::Closed) => Err(CoreError::Closed),
        }
    }
}

impl<T> BufferedSender<T> {
    /// Place `value` in the slot and return immediately.
    ///
    /// Hands the value back if nobody is listening anymore (e.g. the peer timed
    /// out); the sending task can simply finish instead of leaking.
    pub fn send_buffered(self, value: T) -> Result<(), T> {
        self.tx.send(value).inspect_err(|_| {
            trace!("buffered signal dropped: receiver gone");
        })
    }

    /// Returns `true` once the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn send_without_receiver_waiting() {
        let (tx, mut rx) = Buffered::<u32>::channel();
        assert!(tx.send_buffered(5).is_ok());

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(rx.recv().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn send_after_receiver_left_returns_value() {
        let (tx, rx) = Buffered::<&'static str>::channel();
        drop(rx);
        assert!(tx.is_closed());
        assert_eq!(tx.send_buffered("late"), Err("late"));
    }

    #[test]
    fn try_recv_states() {
        let (tx, mut rx) = Buffered::<u8>::channel();
        assert!(matches!(rx.try_recv(), Ok(None)));
        tx.send_buffered(1).unwrap();
        assert!(matches!(rx.try_recv(), Ok(Some(1))));

        let (tx, mut rx) = Buffered::<u8>::channel();
        drop(tx);
        assert!(matches!(rx.try_recv(), Err(CoreError::Closed)));
    }
}
