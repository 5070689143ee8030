//! Command decoding errors
//!
//! Every failure point in the pipeline gets its own variant so the log line
//! names the exact stage, but all of them map to the same generic 400 — the
//! client must not be able to probe where its input died.

use thiserror::Error;

use crate::channel::ChannelError;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Command decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Outer JSON envelope failed to parse
    #[error("Malformed request envelope: {0}")]
    Envelope(String),

    /// Blob is not valid base64
    #[error("Blob is not valid base64: {0}")]
    Base64(String),

    /// Secure Channel rejected or failed on the ciphertext
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Decrypted plaintext is not a valid command payload
    #[error("Malformed command payload: {0}")]
    Payload(String),

    /// Payload requested both roles at once
    #[error("Command requests both validator and backup roles")]
    ConflictingFlags,
}

impl DecodeError {
    /// HTTP status for this error: always a generic bad request
    pub fn status_code(&self) -> u16 {
        400
    }

    /// True when the underlying Secure Channel backend is unhealthy
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, DecodeError::Channel(e) if e.is_backend())
    }
}
