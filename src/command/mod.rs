//! # Command Decoder
//!
//! Turns an inbound request body into a validated, typed failover command:
//! outer JSON envelope -> base64 blob -> Secure Channel decrypt -> inner JSON
//! payload -> shape check.
//!
//! Decoding is a pure transform: it never touches the Challenge Manager or
//! the Unit Supervisor. The caller is responsible for challenge verification
//! after a successful decode.

mod errors;

pub use errors::{DecodeError, DecodeResult};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::channel::SecureChannel;

/// Outer request envelope, sent in the clear
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
    /// Network scope this request targets
    pub network_name: String,
    /// Base64-encoded ciphertext of the command payload
    pub blob: String,
}

/// Decrypted command payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailoverCommand {
    /// Network scope, repeated inside the authenticated payload
    pub network_name: String,
    /// Requests the validator role
    pub validate: bool,
    /// Requests the backup role
    pub backup: bool,
    /// Anti-replay token echoed back from the challenge endpoint
    pub challenge: String,
}

/// Outcome of decoding an inbound request body
#[derive(Debug)]
pub enum Decoded {
    /// The envelope names another network; drop without a response body
    ForeignScope,
    /// A well-formed command for this node
    Command(FailoverCommand),
}

/// Decode an inbound control request body
///
/// Requests scoped to another network are reported as `ForeignScope` before
/// any decryption work happens; everything else either yields a well-formed
/// command or a [`DecodeError`].
pub fn decode<C: SecureChannel>(scope: &str, channel: &C, body: &[u8]) -> DecodeResult<Decoded> {
    let envelope: CommandEnvelope =
        serde_json::from_slice(body).map_err(|e| DecodeError::Envelope(e.to_string()))?;

    if envelope.network_name != scope {
        return Ok(Decoded::ForeignScope);
    }

    let ciphertext = STANDARD
        .decode(envelope.blob.as_bytes())
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let plaintext = channel.decrypt(&ciphertext)?;

    let command: FailoverCommand =
        serde_json::from_slice(&plaintext).map_err(|e| DecodeError::Payload(e.to_string()))?;

    if command.validate && command.backup {
        return Err(DecodeError::ConflictingFlags);
    }

    Ok(Decoded::Command(command))
}
