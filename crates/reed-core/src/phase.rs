//! Session phase state machine.
//!
//! ```text
//! INITIALIZING → STREAMING ⇄ CAPTURING → STREAMING … → STOPPED
//!                STREAMING → ERROR → (reconnect) → STREAMING
//!                ERROR → STOPPED   (second consecutive failure)
//! ```
//!
//! `STOPPED` is terminal. Captures are accepted only while `STREAMING`.

use serde::{Deserialize, Serialize};

/// Phase of a live session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Acquiring media devices; no capture requests accepted.
    Initializing,
    /// Outbound audio/video actively flowing.
    Streaming,
    /// Outbound video paused for the single in-flight capture.
    Capturing,
    /// Transport dropped; reconnect pending.
    Error,
    /// Terminal. All resources released.
    Stopped,
}

impl SessionPhase {
    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(self, next: Self) -> bool {
        use SessionPhase::{Capturing, Error, Initializing, Stopped, Streaming};
        match self {
            Initializing => matches!(next, Streaming | Stopped),
            Streaming => matches!(next, Capturing | Error | Stopped),
            Capturing => matches!(next, Streaming | Stopped),
            Error => matches!(next, Streaming | Stopped),
            Stopped => false,
        }
    }

    /// Whether capture requests are accepted in this phase.
    pub fn accepts_capture(self) -> bool {
        self == Self::Streaming
    }

    /// Whether the session has reached its terminal phase.
    pub fn is_stopped(self) -> bool {
        self == Self::Stopped
    }

    /// Stable string form (matches the serialized representation).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Streaming => "streaming",
            Self::Capturing => "capturing",
            Self::Error => "error",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
