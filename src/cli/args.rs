//! CLI argument definitions using clap
//!
//! Commands:
//! - collator-failover init --config <path> --network <name>
//! - collator-failover start --config <path>
//! - collator-failover encrypt --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Remote-controlled validator/backup failover agent for collator nodes
#[derive(Parser, Debug)]
#[command(name = "collator-failover")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter config and generate a fresh command key
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./failover.json")]
        config: PathBuf,

        /// Network this node serves (scope filter for all requests)
        #[arg(long)]
        network: String,
    },

    /// Start the failover agent
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./failover.json")]
        config: PathBuf,
    },

    /// Encrypt a command payload from stdin into a base64 blob
    ///
    /// This is the helper the external authority uses to produce the `blob`
    /// field of a /failover request.
    Encrypt {
        /// Path to configuration file
        #[arg(long, default_value = "./failover.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
