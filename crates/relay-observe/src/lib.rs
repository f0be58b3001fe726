mod logger;
pub use logger::*;

mod report;
pub use report::{log_outcome, log_result, message_for};
