mod work_id;
pub use work_id::WorkId;

mod work_result;
pub use work_result::WorkResult;

mod operation_error;
pub use operation_error::{ErrorKind, OperationError};

mod operation_state;
pub use operation_state::OperationState;

/// Human-readable label of a unit of work (e.g. `insert USERS value (3)`).
pub type OpLabel = String;
