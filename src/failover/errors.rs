//! Failover errors
//!
//! Refusals (the requested transition is not legal from the observed state)
//! and execution failures (a unit operation went wrong) are kept apart in
//! the type but collapse to the same generic 503 on the wire; the detailed
//! reason is only ever logged locally.

use thiserror::Error;

use crate::supervisor::SupervisorError;

/// Result type for failover operations
pub type FailoverResult<T> = Result<T, FailoverError>;

/// Failover Controller errors
#[derive(Debug, Error)]
pub enum FailoverError {
    /// Validator unit already running; `-> Validator` is an idempotent no-op
    #[error("Node is already validator")]
    AlreadyValidator,

    /// Backup unit already running; `-> Backup` is an idempotent no-op
    #[error("Node is already backup")]
    AlreadyBackup,

    /// `-> Validator` demands a verified Backup starting state; the agent
    /// does not fix an indeterminate state automatically
    #[error("Backup unit was expected to be running but was not")]
    BackupNotRunning,

    /// The Unit Supervisor failed while querying or driving a unit
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    /// A unit operation did not reach a terminal state within the bound
    #[error("Timed out waiting for '{unit}' to {op}")]
    UnitOpTimedOut { unit: String, op: &'static str },
}

impl FailoverError {
    /// HTTP status for this error: every transition problem is a generic 503
    pub fn status_code(&self) -> u16 {
        503
    }

    /// True for benign refusals, false for execution failures
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            FailoverError::AlreadyValidator
                | FailoverError::AlreadyBackup
                | FailoverError::BackupNotRunning
        )
    }
}
