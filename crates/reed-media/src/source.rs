//! Device acquisition seams.
//!
//! [`MediaGateway`] abstracts camera/microphone acquisition: the real
//! implementation talks to platform devices, tests use static sources.
//! Acquisition failure is [`MediaError::Acquisition`] and is fatal to
//! session start.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::MediaError;
use crate::frame::RawFrame;

/// A camera delivering encoded frames.
///
/// `current_frame` is non-blocking: it returns the most recent frame the
/// device produced, or `None` before the first frame arrives.
pub trait VideoSource: Send + Sync {
    /// Latest frame from the device, if any.
    fn current_frame(&self) -> Option<RawFrame>;

    /// Release the device.
    fn release(&self);
}

/// A microphone input. Chunk delivery is wired by the platform layer;
/// the orchestrator only needs to release it on stop.
pub trait AudioSource: Send + Sync {
    /// Release the device.
    fn release(&self);
}

/// Acquired device handles.
#[derive(Clone)]
pub struct MediaHandles {
    /// Camera handle.
    pub video: Arc<dyn VideoSource>,
    /// Microphone handle.
    pub audio: Arc<dyn AudioSource>,
}

impl MediaHandles {
    /// Release both devices.
    pub fn release(&self) {
        self.video.release();
        self.audio.release();
    }
}

/// Camera/microphone acquisition seam.
#[async_trait]
pub trait MediaGateway: Send + Sync {
    /// Acquire camera and microphone.
    ///
    /// Fails with [`MediaError::Acquisition`] when permission is denied or
    /// no device is available.
    async fn acquire(&self) -> Result<MediaHandles, MediaError>;
}
