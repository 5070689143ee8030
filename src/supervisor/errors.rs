//! Unit Supervisor errors

use thiserror::Error;

/// Result type for supervisor operations
pub type SupervisorResult<T> = Result<T, SupervisorError>;

/// Unit Supervisor errors
#[derive(Debug, Clone, Error)]
pub enum SupervisorError {
    /// The supervisor itself could not be reached or invoked
    #[error("Supervisor unavailable: {0}")]
    Unavailable(String),

    /// The supervisor ran the operation and reported failure
    #[error("Unit operation failed on '{unit}': {detail}")]
    OperationFailed { unit: String, detail: String },
}
