//! The remote conversational session seam.
//!
//! [`LiveTransport`] is the boundary between orchestration and the wire:
//! outbound frames and audio go down, [`LiveEvent`]s come back up on a
//! channel, and tool invocations are answered through
//! [`LiveTransport::acknowledge_tool_result`]. Tests script the seam; the
//! real implementation speaks the provider's live protocol.

use async_trait::async_trait;
use tokio::sync::mpsc;

use reed_core::ids::{CorrelationToken, ItemId};
use reed_core::orb::AudioActivity;
use reed_media::frame::RawFrame;

/// Transport failure. Carries the provider's reason verbatim.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    /// Build from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Inbound events from the remote session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LiveEvent {
    /// Audio activity changed (remote playback started/stopped, local
    /// speech detected/quiet). Drives the orb.
    AudioActivity {
        /// The observed activity.
        activity: AudioActivity,
    },
    /// The remote model invoked the snapshot tool.
    ToolInvocation {
        /// Token the acknowledgment must echo back.
        token: CorrelationToken,
    },
    /// The connection dropped.
    Disconnected {
        /// Provider-supplied reason.
        reason: String,
    },
}

/// Result reported back for a remote tool invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Capture completed; the item was persisted.
    Success {
        /// Identifier of the created item.
        item_id: ItemId,
    },
    /// Capture failed or was rejected.
    Failure {
        /// Human-readable reason.
        reason: String,
    },
}

/// Live connection to the remote conversational model.
#[async_trait]
pub trait LiveTransport: Send + Sync {
    /// Open (or re-open) the connection. Returns the inbound event
    /// channel for this connection's lifetime.
    async fn connect(&self) -> Result<mpsc::Receiver<LiveEvent>, TransportError>;

    /// Submit one outbound video frame.
    async fn send_video_frame(&self, frame: &RawFrame) -> Result<(), TransportError>;

    /// Submit one outbound audio chunk (PCM).
    async fn send_audio(&self, chunk: &[u8]) -> Result<(), TransportError>;

    /// Answer a tool invocation. Called exactly once per token.
    async fn acknowledge_tool_result(
        &self,
        token: &CorrelationToken,
        outcome: ToolOutcome,
    ) -> Result<(), TransportError>;

    /// Close the connection. Idempotent.
    async fn close(&self);
}
