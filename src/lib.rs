//! collator-failover - remote-controlled validator/backup failover agent
//!
//! Runs on a collator node and lets an external health-monitoring authority
//! flip the node between active validator and warm backup over an
//! authenticated, replay-safe control channel.
//!
//! This agent does NOT guarantee that two nodes are never in validator role
//! at once. A node that is offline while the authority promotes another
//! backup cannot receive its demotion command; when it comes back it may
//! resume validating until the authority's next run notices. The agent's job
//! is only to make each individual node's local transition correct,
//! idempotent, and replay-safe.

pub mod challenge;
pub mod channel;
pub mod cli;
pub mod command;
pub mod config;
pub mod failover;
pub mod http_server;
pub mod observability;
pub mod supervisor;
