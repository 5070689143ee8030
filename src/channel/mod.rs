//! # Secure Channel
//!
//! Decryption backend for inbound command blobs.
//!
//! The channel has no knowledge of the payload's meaning: it turns an opaque
//! ciphertext into plaintext bytes, or fails. Failures are classified so the
//! caller can tell "the backend rejected this ciphertext" apart from "the
//! backend itself misbehaved" — the latter is logged at FATAL severity but
//! does not terminate the process; the agent keeps serving.

mod local_key;

pub use local_key::LocalKeyChannel;

use thiserror::Error;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Secure Channel errors
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// Backend-reported decryption failure (wrong key, tampered or truncated
    /// ciphertext). Expected under probing; maps to a generic 400.
    #[error("Decryption failed")]
    Decrypt,

    /// Unexpected/unclassified backend failure. The trust state of the
    /// channel is unknown; logged as an operator alert.
    #[error("Channel backend error: {0}")]
    Backend(String),
}

impl ChannelError {
    /// True for failures that mean the backend itself is unhealthy
    pub fn is_backend(&self) -> bool {
        matches!(self, ChannelError::Backend(_))
    }
}

/// Decrypts opaque command ciphertexts
pub trait SecureChannel: Send + Sync {
    /// Decrypt `ciphertext` into plaintext bytes
    fn decrypt(&self, ciphertext: &[u8]) -> ChannelResult<Vec<u8>>;
}
