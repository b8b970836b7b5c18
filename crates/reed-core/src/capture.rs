//! Capture requests.
//!
//! A [`CaptureRequest`] is ephemeral: created when a trigger fires,
//! consumed once a frame is produced or the request fails. Requests from
//! the remote session carry a correlation token that must be acknowledged
//! exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CorrelationToken;

/// Where a capture trigger came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOrigin {
    /// Local user action (capture button).
    Local,
    /// Asynchronous tool invocation from the remote session.
    RemoteTool,
}

/// A pending request to produce a still frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Trigger origin.
    pub origin: CaptureOrigin,
    /// Correlation token; present iff `origin` is [`CaptureOrigin::RemoteTool`].
    pub correlation: Option<CorrelationToken>,
    /// When the trigger fired.
    pub requested_at: DateTime<Utc>,
}

impl CaptureRequest {
    /// A locally-triggered request.
    pub fn local() -> Self {
        Self {
            origin: CaptureOrigin::Local,
            correlation: None,
            requested_at: Utc::now(),
        }
    }

    /// A remote tool invocation carrying its correlation token.
    pub fn remote(token: CorrelationToken) -> Self {
        Self {
            origin: CaptureOrigin::RemoteTool,
            correlation: Some(token),
            requested_at: Utc::now(),
        }
    }
}
