//! # HTTP Server
//!
//! Binds the control channel router. The agent should always be running on
//! the node; the external health-monitoring authority is the only intended
//! client.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use super::control_routes::{control_routes, ControlState};
use crate::challenge::ChallengeManager;
use crate::channel::SecureChannel;
use crate::config::AgentConfig;
use crate::failover::FailoverController;
use crate::supervisor::UnitSupervisor;

/// HTTP server for the failover control channel
pub struct ControlServer {
    addr: String,
    router: Router,
}

impl ControlServer {
    /// Assemble the server from its collaborators
    pub fn new<S, C>(config: &AgentConfig, supervisor: S, channel: C) -> Self
    where
        S: UnitSupervisor + 'static,
        C: SecureChannel + 'static,
    {
        let state = Arc::new(ControlState {
            network_name: config.network_name.clone(),
            challenges: ChallengeManager::new(),
            channel,
            controller: FailoverController::new(supervisor, config),
        });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let router = control_routes(state).layer(cors);

        Self {
            addr: config.socket_addr(),
            router,
        }
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{}", e)))?;

        println!("Starting failover control channel on {}", addr);
        println!("  - GET  /challenge    - issue anti-replay token");
        println!("  - POST /failover     - execute role transition");
        println!("  - GET  /is-validator - query current role");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
