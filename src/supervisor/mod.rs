//! # Unit Supervisor
//!
//! Reports and changes the run state of the two OS-level service units the
//! node can run as (validator unit, backup unit).
//!
//! Unit status is queried ephemerally per call and never cached: role state
//! is always rederived at the moment of each request ("derive, don't cache").
//! Stop/start operations are awaited to terminal completion before the
//! caller proceeds.

mod errors;
mod systemctl;

pub use errors::{SupervisorError, SupervisorResult};
pub use systemctl::SystemctlSupervisor;

use std::fmt;
use std::future::Future;

/// Observed run state of a service unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// The unit is actively running
    Running,
    /// The unit is stopped (inactive or failed)
    Stopped,
    /// The supervisor reported a state this agent does not recognize
    Unknown,
}

impl UnitState {
    pub fn is_running(&self) -> bool {
        matches!(self, UnitState::Running)
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitState::Running => "running",
            UnitState::Stopped => "stopped",
            UnitState::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Backend trait for service unit supervision
///
/// Implementations must only resolve the stop/start futures once the
/// underlying operation has reached a terminal outcome.
pub trait UnitSupervisor: Send + Sync {
    /// Observed state of `unit` right now
    fn status(&self, unit: &str) -> impl Future<Output = SupervisorResult<UnitState>> + Send;

    /// Stop `unit`, resolving once the stop job completes
    fn stop_unit(&self, unit: &str) -> impl Future<Output = SupervisorResult<()>> + Send;

    /// Start `unit`, resolving once the start job completes
    fn start_unit(&self, unit: &str) -> impl Future<Output = SupervisorResult<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_running_counts_as_running() {
        assert!(UnitState::Running.is_running());
        assert!(!UnitState::Stopped.is_running());
        assert!(!UnitState::Unknown.is_running());
    }

    #[test]
    fn test_unit_state_display() {
        assert_eq!(UnitState::Running.to_string(), "running");
        assert_eq!(UnitState::Stopped.to_string(), "stopped");
        assert_eq!(UnitState::Unknown.to_string(), "unknown");
    }
}
