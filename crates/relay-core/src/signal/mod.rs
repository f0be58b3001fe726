//! Event signaling between tasks.
//!
//! - [`Signal`] / [`SignalWaiter`]: payload-less "done", closed once by its owner and
//!   observed by any number of waiters.
//! - [`Rendezvous`]: zero-buffer hand-off; the sender resumes only after a receiver
//!   has taken the value.
//! - [`Buffered`]: single-slot hand-off; the sender never blocks.

mod buffered;
pub use buffered::{Buffered, BufferedSender};

mod done;
pub use done::{Signal, SignalWaiter};

mod rendezvous;
pub use rendezvous::{Rendezvous, RendezvousSender};
