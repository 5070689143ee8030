//! systemd backend for the Unit Supervisor
//!
//! Shells out to `systemctl`. `systemctl stop`/`start` block until the
//! queued job reaches a terminal state, so awaiting the child process is the
//! "operation complete" signal. The two units are expected to list each
//! other in `Conflicts=`; OS-level mutual exclusion is systemd's job, not
//! this agent's.

use tokio::process::Command;

use super::{SupervisorError, SupervisorResult, UnitState, UnitSupervisor};

/// Unit Supervisor backed by the local systemd instance
#[derive(Debug, Clone)]
pub struct SystemctlSupervisor {
    binary: String,
}

impl SystemctlSupervisor {
    pub fn new() -> Self {
        Self {
            binary: "systemctl".to_string(),
        }
    }

    /// Use an alternative systemctl binary (tests, containers)
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> SupervisorResult<std::process::Output> {
        Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| SupervisorError::Unavailable(format!("failed to run systemctl: {}", e)))
    }

    async fn run_job(&self, verb: &str, unit: &str) -> SupervisorResult<()> {
        let output = self.run(&[verb, unit]).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(SupervisorError::OperationFailed {
                unit: unit.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Default for SystemctlSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitSupervisor for SystemctlSupervisor {
    async fn status(&self, unit: &str) -> SupervisorResult<UnitState> {
        // `is-active` exits non-zero for inactive units; the state is in
        // stdout either way, so only a spawn failure is an error.
        let output = self.run(&["is-active", unit]).await?;
        let state = String::from_utf8_lossy(&output.stdout);
        Ok(parse_active_state(state.trim()))
    }

    async fn stop_unit(&self, unit: &str) -> SupervisorResult<()> {
        self.run_job("stop", unit).await
    }

    async fn start_unit(&self, unit: &str) -> SupervisorResult<()> {
        self.run_job("start", unit).await
    }
}

fn parse_active_state(state: &str) -> UnitState {
    match state {
        "active" | "reloading" => UnitState::Running,
        "inactive" | "failed" | "deactivating" => UnitState::Stopped,
        _ => UnitState::Unknown,
    }
}
