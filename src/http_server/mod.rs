//! # HTTP Server
//!
//! The control channel surface: server assembly and route handlers.

mod control_routes;
mod server;

pub use control_routes::{control_routes, ChallengeResponse, ControlResponse, ControlState};
pub use server::ControlServer;
