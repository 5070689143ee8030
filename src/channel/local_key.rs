//! Local-key Secure Channel backend
//!
//! AES-256-GCM with a 32-byte key held in a base64-encoded key file shared
//! with the external authority. Blob layout: nonce (12 bytes) || ciphertext.

use std::fs;
use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::{ChannelError, ChannelResult, SecureChannel};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// AES-256-GCM channel keyed from a local key file
pub struct LocalKeyChannel {
    cipher: Aes256Gcm,
    fingerprint: String,
}

impl LocalKeyChannel {
    /// Build a channel from raw key bytes
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        let fingerprint = fingerprint(key);
        Self {
            cipher: Aes256Gcm::new_from_slice(key).expect("32-byte key"),
            fingerprint,
        }
    }

    /// Load the key from a base64-encoded key file
    pub fn from_key_file(path: &Path) -> ChannelResult<Self> {
        let encoded = fs::read_to_string(path)
            .map_err(|e| ChannelError::Backend(format!("failed to read key file: {}", e)))?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ChannelError::Backend(format!("key file is not valid base64: {}", e)))?;
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| ChannelError::Backend("key must be exactly 32 bytes".to_string()))?;
        Ok(Self::new(&key))
    }

    /// Generate a fresh random key and write it base64-encoded to `path`
    pub fn generate_key_file(path: &Path) -> ChannelResult<()> {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        fs::write(path, STANDARD.encode(key))
            .map_err(|e| ChannelError::Backend(format!("failed to write key file: {}", e)))
    }

    /// SHA-256 fingerprint of the key, for boot logging
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Encrypt plaintext into a blob the control endpoint accepts
    ///
    /// Used by the `encrypt` CLI command and by tests; the agent itself only
    /// ever decrypts.
    pub fn encrypt(&self, plaintext: &[u8]) -> ChannelResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| ChannelError::Backend(format!("encrypt failed: {}", e)))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }
}

impl SecureChannel for LocalKeyChannel {
    fn decrypt(&self, ciphertext: &[u8]) -> ChannelResult<Vec<u8>> {
        if ciphertext.len() < NONCE_LEN {
            return Err(ChannelError::Decrypt);
        }
        let (nonce_bytes, body) = ciphertext.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        // AES-GCM is authenticated; any failure here is a rejection of the
        // ciphertext, not a backend malfunction.
        self.cipher
            .decrypt(nonce, body)
            .map_err(|_| ChannelError::Decrypt)
    }
}

fn fingerprint(key: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key);
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}
