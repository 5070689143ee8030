//! Shared test fixtures: a stateful in-memory Unit Supervisor and router
//! assembly helpers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::Router;

use collator_failover::challenge::ChallengeManager;
use collator_failover::channel::LocalKeyChannel;
use collator_failover::config::AgentConfig;
use collator_failover::failover::FailoverController;
use collator_failover::http_server::{control_routes, ControlState};
use collator_failover::supervisor::{SupervisorError, SupervisorResult, UnitState, UnitSupervisor};

pub const NETWORK: &str = "shiden";
pub const VALIDATOR: &str = "collator-validator.service";
pub const BACKUP: &str = "collator-backup.service";
pub const KEY: [u8; 32] = [42u8; 32];

pub fn agent_config() -> AgentConfig {
    AgentConfig {
        network_name: NETWORK.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        validator_unit: VALIDATOR.to_string(),
        backup_unit: BACKUP.to_string(),
        key_file: PathBuf::from("/dev/null"),
        unit_op_timeout_secs: 5,
    }
}

/// In-memory supervisor: unit states mutate on stop/start, every operation
/// is recorded, and status queries can be made to fail.
#[derive(Clone)]
pub struct MemorySupervisor {
    states: Arc<Mutex<HashMap<String, UnitState>>>,
    ops: Arc<Mutex<Vec<String>>>,
    fail_status: Arc<Mutex<bool>>,
}

impl MemorySupervisor {
    pub fn new(validator: UnitState, backup: UnitState) -> Self {
        let mut states = HashMap::new();
        states.insert(VALIDATOR.to_string(), validator);
        states.insert(BACKUP.to_string(), backup);
        Self {
            states: Arc::new(Mutex::new(states)),
            ops: Arc::new(Mutex::new(Vec::new())),
            fail_status: Arc::new(Mutex::new(false)),
        }
    }

    pub fn unit_ops(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| !op.starts_with("status"))
            .cloned()
            .collect()
    }

    pub fn state_of(&self, unit: &str) -> UnitState {
        *self.states.lock().unwrap().get(unit).unwrap()
    }

    pub fn set_fail_status(&self, fail: bool) {
        *self.fail_status.lock().unwrap() = fail;
    }

    fn record(&self, op: &str, unit: &str) {
        self.ops.lock().unwrap().push(format!("{} {}", op, unit));
    }
}

impl UnitSupervisor for MemorySupervisor {
    async fn status(&self, unit: &str) -> SupervisorResult<UnitState> {
        self.record("status", unit);
        if *self.fail_status.lock().unwrap() {
            return Err(SupervisorError::Unavailable("injected".to_string()));
        }
        Ok(self
            .states
            .lock()
            .unwrap()
            .get(unit)
            .copied()
            .unwrap_or(UnitState::Unknown))
    }

    async fn stop_unit(&self, unit: &str) -> SupervisorResult<()> {
        self.record("stop", unit);
        self.states
            .lock()
            .unwrap()
            .insert(unit.to_string(), UnitState::Stopped);
        Ok(())
    }

    async fn start_unit(&self, unit: &str) -> SupervisorResult<()> {
        self.record("start", unit);
        self.states
            .lock()
            .unwrap()
            .insert(unit.to_string(), UnitState::Running);
        Ok(())
    }
}

/// Assemble the full control router over a given supervisor
pub fn control_router(supervisor: MemorySupervisor) -> Router {
    let config = agent_config();
    let state = Arc::new(ControlState {
        network_name: config.network_name.clone(),
        challenges: ChallengeManager::new(),
        channel: LocalKeyChannel::new(&KEY),
        controller: FailoverController::new(supervisor, &config),
    });
    control_routes(state)
}

/// The authority-side channel (same key as the agent)
pub fn authority_channel() -> LocalKeyChannel {
    LocalKeyChannel::new(&KEY)
}
