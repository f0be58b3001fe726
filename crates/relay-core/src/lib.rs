pub mod error;
pub use error::{CoreError, IntegrityError, integrity_violation};

pub mod signal;
pub use signal::{Buffered, BufferedSender, Rendezvous, RendezvousSender, Signal, SignalWaiter};

pub mod fanout;
pub use fanout::{FanOutCollector, FanOutConfig, FanOutReport};

pub mod queue;
pub use queue::{DropQueueConfig, DropReceiver, DropSender, QueueStats, drop_queue};

pub mod cancel;
pub use cancel::{CancelGuard, CancelSource, CancelToken, CancellableOperation, Interrupted, Outcome};

pub mod shutdown;
pub use shutdown::{Shutdown, ShutdownConfig, ShutdownOutcome, os_interrupt};

/// Largest buffer a tokio mpsc channel accepts.
pub const MAX_CHANNEL_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

pub mod prelude {
    pub use crate::cancel::{CancelSource, CancelToken, CancellableOperation, Outcome};
    pub use crate::error::{CoreError, IntegrityError};
    pub use crate::fanout::{FanOutCollector, FanOutConfig};
    pub use crate::queue::{DropQueueConfig, drop_queue};
    pub use crate::signal::{Rendezvous, Signal};
    pub use relay_model::{OperationError, OperationState, WorkId, WorkResult};
}
