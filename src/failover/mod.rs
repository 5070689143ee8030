//! # Failover Controller
//!
//! Given a decoded, challenge-verified command, decides the legal role
//! transition and drives the Unit Supervisor through it.
//!
//! Role state is never stored: it is rederived by querying unit status at
//! the moment of each request, so there is no cache to go stale.
//!
//! The two directions are deliberately asymmetric. Entering validator role
//! enables block signing, so it demands a verified known-good starting state
//! (backup running, validator stopped). Leaving validator role for backup is
//! the safety-preferred direction and must succeed even from an unexpected
//! state, so the validator stop is best-effort.
//!
//! ## Invariants
//! - FO1: At most one stop/start sequence in flight (global transition gate)
//! - FO2: Never start the target unit while the source unit might still be up
//! - FO3: Every unit wait is bounded; a hung operation surfaces as a timeout

mod errors;

pub use errors::{FailoverError, FailoverResult};

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::command::FailoverCommand;
use crate::config::AgentConfig;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::supervisor::{SupervisorResult, UnitSupervisor};

/// The two mutually-exclusive operating roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Validator,
    Backup,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Validator => "validator",
            Role::Backup => "backup",
        }
    }
}

/// Result of a successfully handled transition command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Backup stopped, validator started
    NowValidator,
    /// Backup started (validator stopped best-effort)
    NowBackup,
    /// Command carried neither role flag; nothing was done
    NoOp,
}

impl TransitionOutcome {
    /// Wire-format `info` string for the control response
    pub fn info(&self) -> &'static str {
        match self {
            TransitionOutcome::NowValidator => "IS_NOW_VALIDATOR",
            TransitionOutcome::NowBackup => "IS_NOW_BACKUP",
            TransitionOutcome::NoOp => "NO_OP",
        }
    }
}

/// Sequences role transitions against the Unit Supervisor
pub struct FailoverController<S> {
    supervisor: S,
    validator_unit: String,
    backup_unit: String,
    unit_op_timeout: Duration,
    /// Serializes every query-then-act sequence; held to terminal outcome
    gate: Mutex<()>,
}

impl<S: UnitSupervisor> FailoverController<S> {
    pub fn new(supervisor: S, config: &AgentConfig) -> Self {
        Self {
            supervisor,
            validator_unit: config.validator_unit.clone(),
            backup_unit: config.backup_unit.clone(),
            unit_op_timeout: config.unit_op_timeout(),
            gate: Mutex::new(()),
        }
    }

    /// Execute at most one role transition for a verified command
    pub async fn transition(&self, command: &FailoverCommand) -> FailoverResult<TransitionOutcome> {
        let _gate = self.gate.lock().await;

        if command.validate {
            self.become_validator().await
        } else if command.backup {
            self.become_backup().await
        } else {
            log_event(Event::TransitionNoOp);
            Ok(TransitionOutcome::NoOp)
        }
    }

    /// True iff the validator unit is observed running
    ///
    /// Query failures are hard errors; the caller must never see a silent
    /// "false" for a node whose role could not be determined.
    pub async fn is_validator(&self) -> FailoverResult<bool> {
        let state = self.supervisor.status(&self.validator_unit).await?;
        Ok(state.is_running())
    }

    /// `-> Validator`: strict precondition, ordered stop-then-start
    async fn become_validator(&self) -> FailoverResult<TransitionOutcome> {
        log_event_with_fields(Event::TransitionStart, &[("target", Role::Validator.as_str())]);

        let validator = self.supervisor.status(&self.validator_unit).await?;
        if validator.is_running() {
            return Err(FailoverError::AlreadyValidator);
        }

        let backup = self.supervisor.status(&self.backup_unit).await?;
        if !backup.is_running() {
            return Err(FailoverError::BackupNotRunning);
        }

        log_event_with_fields(Event::UnitStopping, &[("unit", &self.backup_unit)]);
        self.bounded(self.supervisor.stop_unit(&self.backup_unit), &self.backup_unit, "stop")
            .await?;

        log_event_with_fields(Event::UnitStarting, &[("unit", &self.validator_unit)]);
        self.bounded(
            self.supervisor.start_unit(&self.validator_unit),
            &self.validator_unit,
            "start",
        )
        .await?;

        log_event_with_fields(Event::TransitionComplete, &[("role", Role::Validator.as_str())]);
        Ok(TransitionOutcome::NowValidator)
    }

    /// `-> Backup`: best-effort validator stop, then backup start
    async fn become_backup(&self) -> FailoverResult<TransitionOutcome> {
        log_event_with_fields(Event::TransitionStart, &[("target", Role::Backup.as_str())]);

        let backup = self.supervisor.status(&self.backup_unit).await?;
        if backup.is_running() {
            return Err(FailoverError::AlreadyBackup);
        }

        // Getting a backup running is the overriding priority; systemd's
        // Conflicts= will stop the validator anyway once backup starts.
        log_event_with_fields(Event::UnitStopping, &[("unit", &self.validator_unit)]);
        if let Err(e) = self
            .bounded(
                self.supervisor.stop_unit(&self.validator_unit),
                &self.validator_unit,
                "stop",
            )
            .await
        {
            log_event_with_fields(
                Event::TransitionFailed,
                &[
                    ("detail", &e.to_string()),
                    ("ignored", "true"),
                    ("unit", &self.validator_unit),
                ],
            );
        }

        log_event_with_fields(Event::UnitStarting, &[("unit", &self.backup_unit)]);
        self.bounded(
            self.supervisor.start_unit(&self.backup_unit),
            &self.backup_unit,
            "start",
        )
        .await?;

        log_event_with_fields(Event::TransitionComplete, &[("role", Role::Backup.as_str())]);
        Ok(TransitionOutcome::NowBackup)
    }

    /// Await a unit operation with the configured bound
    async fn bounded<F>(&self, fut: F, unit: &str, op: &'static str) -> FailoverResult<()>
    where
        F: Future<Output = SupervisorResult<()>>,
    {
        match timeout(self.unit_op_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(FailoverError::UnitOpTimedOut {
                unit: unit.to_string(),
                op,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::{SupervisorError, SupervisorResult, UnitState};
    use std::path::PathBuf;
    use std::sync::Mutex as StdMutex;

    const VALIDATOR: &str = "val.service";
    const BACKUP: &str = "bak.service";

    fn config() -> AgentConfig {
        AgentConfig {
            network_name: "shiden".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            validator_unit: VALIDATOR.to_string(),
            backup_unit: BACKUP.to_string(),
            key_file: PathBuf::from("/dev/null"),
            unit_op_timeout_secs: 1,
        }
    }

    fn command(validate: bool, backup: bool) -> FailoverCommand {
        FailoverCommand {
            network_name: "shiden".to_string(),
            validate,
            backup,
            challenge: "tok".to_string(),
        }
    }

    /// Records every operation; per-unit canned states and failures
    struct FakeSupervisor {
        validator_state: UnitState,
        backup_state: UnitState,
        fail_stop: Option<&'static str>,
        fail_start: Option<&'static str>,
        hang_stop: bool,
        ops: StdMutex<Vec<String>>,
    }

    impl FakeSupervisor {
        fn new(validator_state: UnitState, backup_state: UnitState) -> Self {
            Self {
                validator_state,
                backup_state,
                fail_stop: None,
                fail_start: None,
                hang_stop: false,
                ops: StdMutex::new(Vec::new()),
            }
        }

        fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }

        fn record(&self, op: &str, unit: &str) {
            self.ops.lock().unwrap().push(format!("{} {}", op, unit));
        }
    }

    impl UnitSupervisor for &FakeSupervisor {
        async fn status(&self, unit: &str) -> SupervisorResult<UnitState> {
            self.record("status", unit);
            Ok(if unit == VALIDATOR {
                self.validator_state
            } else {
                self.backup_state
            })
        }

        async fn stop_unit(&self, unit: &str) -> SupervisorResult<()> {
            self.record("stop", unit);
            if self.hang_stop {
                std::future::pending::<()>().await;
            }
            if self.fail_stop == Some(unit) {
                return Err(SupervisorError::OperationFailed {
                    unit: unit.to_string(),
                    detail: "injected".to_string(),
                });
            }
            Ok(())
        }

        async fn start_unit(&self, unit: &str) -> SupervisorResult<()> {
            self.record("start", unit);
            if self.fail_start == Some(unit) {
                return Err(SupervisorError::OperationFailed {
                    unit: unit.to_string(),
                    detail: "injected".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_to_validator_stops_backup_then_starts_validator() {
        let fake = FakeSupervisor::new(UnitState::Stopped, UnitState::Running);
        let controller = FailoverController::new(&fake, &config());

        let outcome = controller.transition(&command(true, false)).await.unwrap();
        assert_eq!(outcome, TransitionOutcome::NowValidator);
        assert_eq!(
            fake.ops(),
            vec![
                format!("status {}", VALIDATOR),
                format!("status {}", BACKUP),
                format!("stop {}", BACKUP),
                format!("start {}", VALIDATOR),
            ]
        );
    }

    #[tokio::test]
    async fn test_to_validator_refused_when_already_validator() {
        let fake = FakeSupervisor::new(UnitState::Running, UnitState::Stopped);
        let controller = FailoverController::new(&fake, &config());

        let err = controller.transition(&command(true, false)).await.unwrap_err();
        assert!(matches!(err, FailoverError::AlreadyValidator));
        // Idempotent refusal: no stop/start issued
        assert!(fake.ops().iter().all(|op| op.starts_with("status")));
    }

    #[tokio::test]
    async fn test_to_validator_refused_when_backup_not_running() {
        let fake = FakeSupervisor::new(UnitState::Stopped, UnitState::Stopped);
        let controller = FailoverController::new(&fake, &config());

        let err = controller.transition(&command(true, false)).await.unwrap_err();
        assert!(matches!(err, FailoverError::BackupNotRunning));
        assert!(fake.ops().iter().all(|op| op.starts_with("status")));
    }

    #[tokio::test]
    async fn test_to_validator_surfaces_start_failure() {
        let mut fake = FakeSupervisor::new(UnitState::Stopped, UnitState::Running);
        fake.fail_start = Some(VALIDATOR);
        let controller = FailoverController::new(&fake, &config());

        let err = controller.transition(&command(true, false)).await.unwrap_err();
        assert!(matches!(err, FailoverError::Supervisor(_)));
        assert!(!err.is_refusal());
    }

    #[tokio::test]
    async fn test_to_backup_refused_only_when_backup_running() {
        let fake = FakeSupervisor::new(UnitState::Stopped, UnitState::Running);
        let controller = FailoverController::new(&fake, &config());

        let err = controller.transition(&command(false, true)).await.unwrap_err();
        assert!(matches!(err, FailoverError::AlreadyBackup));
    }

    #[tokio::test]
    async fn test_to_backup_ignores_validator_stop_failure() {
        let mut fake = FakeSupervisor::new(UnitState::Running, UnitState::Stopped);
        fake.fail_stop = Some(VALIDATOR);
        let controller = FailoverController::new(&fake, &config());

        let outcome = controller.transition(&command(false, true)).await.unwrap();
        assert_eq!(outcome, TransitionOutcome::NowBackup);
        assert!(fake.ops().contains(&format!("start {}", BACKUP)));
    }

    #[tokio::test]
    async fn test_to_backup_surfaces_backup_start_failure() {
        let mut fake = FakeSupervisor::new(UnitState::Running, UnitState::Stopped);
        fake.fail_start = Some(BACKUP);
        let controller = FailoverController::new(&fake, &config());

        let err = controller.transition(&command(false, true)).await.unwrap_err();
        assert!(matches!(err, FailoverError::Supervisor(_)));
    }

    #[tokio::test]
    async fn test_to_backup_works_from_indeterminate_state() {
        // Neither unit running: backup direction must still succeed
        let fake = FakeSupervisor::new(UnitState::Stopped, UnitState::Stopped);
        let controller = FailoverController::new(&fake, &config());

        let outcome = controller.transition(&command(false, true)).await.unwrap();
        assert_eq!(outcome, TransitionOutcome::NowBackup);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_unit_operation_times_out() {
        let mut fake = FakeSupervisor::new(UnitState::Stopped, UnitState::Running);
        fake.hang_stop = true;
        let controller = FailoverController::new(&fake, &config());

        let err = controller.transition(&command(true, false)).await.unwrap_err();
        // A hung operation is a timeout, not an operation failure
        assert!(matches!(err, FailoverError::UnitOpTimedOut { op: "stop", .. }));
        assert!(!err.is_refusal());
    }

    #[tokio::test]
    async fn test_neither_flag_is_a_no_op() {
        let fake = FakeSupervisor::new(UnitState::Stopped, UnitState::Running);
        let controller = FailoverController::new(&fake, &config());

        let outcome = controller.transition(&command(false, false)).await.unwrap();
        assert_eq!(outcome, TransitionOutcome::NoOp);
        assert!(fake.ops().is_empty());
    }

    #[tokio::test]
    async fn test_is_validator_reflects_unit_state() {
        let fake = FakeSupervisor::new(UnitState::Running, UnitState::Stopped);
        let controller = FailoverController::new(&fake, &config());
        assert!(controller.is_validator().await.unwrap());

        let fake = FakeSupervisor::new(UnitState::Stopped, UnitState::Running);
        let controller = FailoverController::new(&fake, &config());
        assert!(!controller.is_validator().await.unwrap());
    }

    #[tokio::test]
    async fn test_outcome_info_strings() {
        assert_eq!(TransitionOutcome::NowValidator.info(), "IS_NOW_VALIDATOR");
        assert_eq!(TransitionOutcome::NowBackup.info(), "IS_NOW_BACKUP");
        assert_eq!(TransitionOutcome::NoOp.info(), "NO_OP");
    }
}
