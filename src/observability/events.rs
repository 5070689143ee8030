//! Observable events for the failover agent
//!
//! Events are explicit and typed. One log line = one event.

use std::fmt;

use super::logger::Severity;

/// Observable events in the failover agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    /// Agent startup begins
    BootStart,
    /// Agent startup complete, control channel serving
    BootComplete,
    /// Configuration loaded
    ConfigLoaded,
    /// Command key loaded, fingerprint logged
    KeyLoaded,

    // Challenge lifecycle
    /// A fresh anti-replay challenge was issued (previous one invalidated)
    ChallengeIssued,
    /// A command carried a challenge that is not the live one
    ChallengeMismatch,

    // Command decoding
    /// A failover command arrived on the control endpoint
    FailoverRequested,
    /// Command failed to decode (envelope, base64, decrypt, or payload)
    DecodeFailed,
    /// Secure Channel backend failed in an unclassified way
    ChannelBackendError,

    // Transitions
    /// Transition sequence started
    TransitionStart,
    /// Transition refused from the current observed state
    TransitionRefused,
    /// Unit stop issued
    UnitStopping,
    /// Unit start issued
    UnitStarting,
    /// Transition completed, node is now in the requested role
    TransitionComplete,
    /// Transition failed mid-sequence; no rollback is attempted
    TransitionFailed,
    /// Command carried neither role flag
    TransitionNoOp,

    // Status
    /// Role query could not be answered
    StatusQueryFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::BootComplete => "BOOT_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::KeyLoaded => "KEY_LOADED",
            Event::ChallengeIssued => "CHALLENGE_ISSUED",
            Event::ChallengeMismatch => "CHALLENGE_MISMATCH",
            Event::FailoverRequested => "FAILOVER_REQUESTED",
            Event::DecodeFailed => "DECODE_FAILED",
            Event::ChannelBackendError => "CHANNEL_BACKEND_ERROR",
            Event::TransitionStart => "TRANSITION_START",
            Event::TransitionRefused => "TRANSITION_REFUSED",
            Event::UnitStopping => "UNIT_STOPPING",
            Event::UnitStarting => "UNIT_STARTING",
            Event::TransitionComplete => "TRANSITION_COMPLETE",
            Event::TransitionFailed => "TRANSITION_FAILED",
            Event::TransitionNoOp => "TRANSITION_NO_OP",
            Event::StatusQueryFailed => "STATUS_QUERY_FAILED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::ChallengeMismatch | Event::TransitionRefused => Severity::Warn,
            Event::DecodeFailed
            | Event::TransitionFailed
            | Event::StatusQueryFailed => Severity::Error,
            Event::ChannelBackendError => Severity::Fatal,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
