//! CLI command implementations
//!
//! `start` follows a strict boot sequence: load and validate config, load
//! the command key, then bind the control channel. Nothing is started if
//! any step fails.

use std::fs;
use std::io::Read;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::channel::LocalKeyChannel;
use crate::config::AgentConfig;
use crate::http_server::ControlServer;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::supervisor::SystemctlSupervisor;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config, network } => init(&config, &network),
        Command::Start { config } => start(&config),
        Command::Encrypt { config } => encrypt(&config),
    }
}

/// Write a starter config and generate a fresh command key
pub fn init(config_path: &Path, network: &str) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    let key_file = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("command.key");
    if key_file.exists() {
        return Err(CliError::already_initialized(&key_file));
    }

    let config = AgentConfig::starter(network, key_file.clone());
    config
        .validate()
        .map_err(|e| CliError::config_error(e.to_string()))?;

    LocalKeyChannel::generate_key_file(&key_file)
        .map_err(|e| CliError::key_error(e.to_string()))?;

    let content = serde_json::to_string_pretty(&config)
        .map_err(|e| CliError::config_error(e.to_string()))?;
    fs::write(config_path, content)
        .map_err(|e| CliError::io_error(format!("Failed to write config: {}", e)))?;

    println!("Wrote config to {}", config_path.display());
    println!("Wrote command key to {}", key_file.display());
    println!("Share the key with the health-check authority, then edit the unit names.");
    Ok(())
}

/// Boot the agent and serve the control channel until terminated
pub fn start(config_path: &Path) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = load_config(config_path)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("backup_unit", &config.backup_unit),
            ("network", &config.network_name),
            ("validator_unit", &config.validator_unit),
        ],
    );

    let channel = load_channel(&config)?;
    log_event_with_fields(Event::KeyLoaded, &[("fingerprint", channel.fingerprint())]);

    let server = ControlServer::new(&config, SystemctlSupervisor::new(), channel);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(async {
        log_event(Event::BootComplete);
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("Server error: {}", e)))
    })
}

/// Encrypt a plaintext payload from stdin into a base64 blob
pub fn encrypt(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let channel = load_channel(&config)?;

    let mut plaintext = String::new();
    std::io::stdin()
        .read_to_string(&mut plaintext)
        .map_err(|e| CliError::io_error(format!("Failed to read stdin: {}", e)))?;

    let blob = channel
        .encrypt(plaintext.trim().as_bytes())
        .map_err(|e| CliError::key_error(e.to_string()))?;

    println!("{}", STANDARD.encode(blob));
    Ok(())
}

fn load_config(path: &Path) -> CliResult<AgentConfig> {
    AgentConfig::load(path).map_err(|e| CliError::config_error(e.to_string()))
}

fn load_channel(config: &AgentConfig) -> CliResult<LocalKeyChannel> {
    LocalKeyChannel::from_key_file(&config.key_file).map_err(|e| CliError::key_error(e.to_string()))
}
