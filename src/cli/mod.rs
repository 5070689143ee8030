//! CLI module for the failover agent
//!
//! Provides the command-line interface:
//! - init: write starter config + command key
//! - start: boot the agent and serve the control channel
//! - encrypt: one-shot payload encryption helper for the authority side

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{encrypt, init, run_command, start};
pub use errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
