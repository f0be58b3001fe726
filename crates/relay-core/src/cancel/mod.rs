//! Racing work against a cancellation source.
//!
//! A [`CancelSource`] combines an explicit cancel, an optional deadline and an
//! optional parent [`crate::SignalWaiter`]. Its [`CancelGuard`] releases it
//! when dropped, so every exit path of the creator cancels it exactly once.
//! Work never gets killed: it receives a [`CancelToken`] and is expected to
//! check it between discrete steps.

mod operation;
pub use operation::{CancellableOperation, Outcome};

mod source;
pub use source::{CancelGuard, CancelSource, CancelToken, Interrupted};
