//! Session error taxonomy.
//!
//! Errors local to a single capture or item mutation are contained and
//! reported to the immediate caller; they never tear down the session.
//! Only device acquisition at start and a second consecutive transport
//! failure are session-fatal.

use reed_core::phase::SessionPhase;
use reed_media::errors::MediaError;
use reed_store::errors::StoreError;

use crate::transport::TransportError;

/// Errors from session orchestration and capture handling.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Camera/microphone acquisition failed. Fatal to session start; a
    /// human must re-grant permission and re-invoke.
    #[error("media acquisition failed: {0}")]
    MediaAcquisition(String),

    /// A capture is already in flight. Recoverable — retry the trigger
    /// or surface "busy" feedback.
    #[error("capture already in flight")]
    CaptureBusy,

    /// Frame extraction exceeded its bound. The stream has already
    /// resumed; the session continues.
    #[error("capture timed out")]
    CaptureTimeout,

    /// Frame extraction failed (no frame, device error).
    #[error("capture extraction failed: {0}")]
    CaptureExtraction(String),

    /// The persistence collaborator rejected or failed the round trip.
    #[error(transparent)]
    Persistence(#[from] StoreError),

    /// The session stopped while the operation was pending.
    #[error("session stopped")]
    SessionStopped,

    /// Capture requests are only accepted while streaming.
    #[error("session is not streaming (phase: {phase})")]
    NotStreaming {
        /// Phase the session was in.
        phase: SessionPhase,
    },

    /// `start()` was called on a session that already left `Initializing`.
    #[error("session already started")]
    AlreadyStarted,

    /// Live transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<MediaError> for SessionError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::Acquisition(s) | MediaError::Device(s) => Self::MediaAcquisition(s),
        }
    }
}

impl From<TransportError> for SessionError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e.0)
    }
}

impl SessionError {
    /// Whether the session survives this error (it is reported to the
    /// originator and streaming continues).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CaptureBusy
                | Self::CaptureTimeout
                | Self::CaptureExtraction(_)
                | Self::Persistence(_)
        )
    }
}
