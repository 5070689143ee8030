//! # Challenge Manager
//!
//! Single-slot anti-replay tokens for the control channel.
//!
//! Exactly one token is live at any time. Issuing a new one invalidates the
//! previous one immediately, whether or not it was ever used. There is no
//! expiry timer: validity is purely "is this the most recently issued token."
//!
//! ## Invariants
//! - CH1: At most one live token, globally
//! - CH2: A verify observes either the old or the new token, never a torn value
//! - CH3: Token comparison is constant-time

use std::sync::RwLock;

use rand::rngs::OsRng;
use rand::Rng;
use subtle::ConstantTimeEq;

/// Length of a challenge token in characters
pub const CHALLENGE_LEN: usize = 32;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Issues and verifies single-slot anti-replay tokens
///
/// Note: `verify` does not consume the token on success. A client could in
/// principle replay an accepted command until the next challenge is issued;
/// the external authority issues a fresh challenge before every command, so
/// this window is accepted.
#[derive(Debug, Default)]
pub struct ChallengeManager {
    live: RwLock<Option<String>>,
}

impl ChallengeManager {
    pub fn new() -> Self {
        Self {
            live: RwLock::new(None),
        }
    }

    /// Generate a fresh token, overwrite the live slot, and return it
    ///
    /// Side effect: any previously issued, unused token becomes permanently
    /// invalid.
    pub fn issue(&self) -> String {
        let token = generate_challenge();
        let mut slot = self.live.write().expect("challenge slot poisoned");
        *slot = Some(token.clone());
        token
    }

    /// True iff `candidate` equals the currently live token
    ///
    /// Always false when no token has been issued yet.
    pub fn verify(&self, candidate: &str) -> bool {
        let slot = self.live.read().expect("challenge slot poisoned");
        match slot.as_deref() {
            Some(live) => constant_time_str_eq(live, candidate),
            None => false,
        }
    }
}

/// Generate a random alphanumeric challenge token
fn generate_challenge() -> String {
    let mut rng = OsRng;
    (0..CHALLENGE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Constant-time comparison of two strings
fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
