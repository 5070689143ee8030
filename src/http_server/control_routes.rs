//! Control channel HTTP routes
//!
//! Three endpoints: `/challenge`, `/failover`, `/is-validator`. Every one is
//! scope-filtered: a request naming another network gets an empty 200 with
//! no body, so a scanner learns nothing about which networks live here.
//!
//! Error responses carry no body at all. The detailed reason for every
//! rejection is logged server-side only.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeManager;
use crate::channel::SecureChannel;
use crate::command::{decode, Decoded};
use crate::failover::FailoverController;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::supervisor::UnitSupervisor;

/// Shared control channel state
pub struct ControlState<S, C> {
    pub network_name: String,
    pub challenges: ChallengeManager,
    pub channel: C,
    pub controller: FailoverController<S>,
}

/// Standard control response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ControlResponse {
    pub status: String,
    pub info: String,
}

impl ControlResponse {
    fn ok(info: impl Into<String>) -> Self {
        Self {
            status: "200".to_string(),
            info: info.into(),
        }
    }
}

/// Challenge endpoint response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

/// Control routes with shared state
pub fn control_routes<S, C>(state: Arc<ControlState<S, C>>) -> Router
where
    S: UnitSupervisor + 'static,
    C: SecureChannel + 'static,
{
    Router::new()
        .route("/challenge", get(challenge_handler))
        .route("/failover", post(failover_handler))
        .route("/is-validator", get(is_validator_handler))
        .with_state(state)
}

/// Empty-bodied response for requests scoped to another network
fn dropped() -> Response {
    StatusCode::OK.into_response()
}

fn scope_mismatch(params: &HashMap<String, String>, network_name: &str) -> bool {
    params.get("networkName").map(String::as_str) != Some(network_name)
}

/// GET /challenge — issue a fresh anti-replay token
///
/// Issuing invalidates the previous token immediately, used or not.
async fn challenge_handler<S, C>(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<ControlState<S, C>>>,
) -> Response
where
    S: UnitSupervisor + 'static,
    C: SecureChannel + 'static,
{
    if scope_mismatch(&params, &state.network_name) {
        return dropped();
    }

    let challenge = state.challenges.issue();
    log_event(Event::ChallengeIssued);
    Json(ChallengeResponse { challenge }).into_response()
}

/// POST /failover — decode, verify, and execute a role transition
async fn failover_handler<S, C>(
    State(state): State<Arc<ControlState<S, C>>>,
    body: Bytes,
) -> Response
where
    S: UnitSupervisor + 'static,
    C: SecureChannel + 'static,
{
    log_event(Event::FailoverRequested);

    let command = match decode(&state.network_name, &state.channel, &body) {
        Ok(Decoded::ForeignScope) => return dropped(),
        Ok(Decoded::Command(command)) => command,
        Err(e) => {
            if e.is_backend_failure() {
                log_event_with_fields(Event::ChannelBackendError, &[("detail", &e.to_string())]);
            } else {
                log_event_with_fields(Event::DecodeFailed, &[("detail", &e.to_string())]);
            }
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if !state.challenges.verify(&command.challenge) {
        log_event(Event::ChallengeMismatch);
        return StatusCode::FORBIDDEN.into_response();
    }

    match state.controller.transition(&command).await {
        Ok(outcome) => Json(ControlResponse::ok(outcome.info())).into_response(),
        Err(e) => {
            let event = if e.is_refusal() {
                Event::TransitionRefused
            } else {
                Event::TransitionFailed
            };
            log_event_with_fields(event, &[("detail", &e.to_string())]);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// GET /is-validator — read-only role query, intentionally unauthenticated
async fn is_validator_handler<S, C>(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<ControlState<S, C>>>,
) -> Response
where
    S: UnitSupervisor + 'static,
    C: SecureChannel + 'static,
{
    if scope_mismatch(&params, &state.network_name) {
        return dropped();
    }

    match state.controller.is_validator().await {
        Ok(is_validator) => {
            Json(ControlResponse::ok(is_validator.to_string())).into_response()
        }
        Err(e) => {
            // Never report "false" for a node whose role is unknown
            log_event_with_fields(Event::StatusQueryFailed, &[("detail", &e.to_string())]);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_mismatch_detection() {
        let mut params = HashMap::new();
        assert!(scope_mismatch(&params, "shiden"));

        params.insert("networkName".to_string(), "kusama".to_string());
        assert!(scope_mismatch(&params, "shiden"));

        params.insert("networkName".to_string(), "shiden".to_string());
        assert!(!scope_mismatch(&params, "shiden"));
    }

    #[test]
    fn test_control_response_status_is_stringly_200() {
        let response = ControlResponse::ok("IS_NOW_VALIDATOR");
        assert_eq!(response.status, "200");
        assert_eq!(response.info, "IS_NOW_VALIDATOR");
    }
}
