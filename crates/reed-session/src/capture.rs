//! Snapshot capture: pause → extract → resume → persist.
//!
//! The pause guard covers only frame extraction. The stream is already
//! flowing again while the persistence round trip runs, so a slow disk
//! never starves the conversation of video.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::time;
use tracing::{debug, instrument, warn};

use reed_core::item::Item;
use reed_media::frame::RawFrame;
use reed_media::stream::OutboundStream;
use reed_store::store::ItemStore;

use crate::errors::SessionError;

/// Poll interval while waiting for the device to produce a frame.
const EXTRACTION_POLL: Duration = Duration::from_millis(20);

/// Runs one capture at a time against the session's outbound stream.
///
/// Mutual exclusion is enforced by the orchestrator's phase gate; the
/// coordinator itself only knows how to run a single capture correctly.
pub struct CaptureCoordinator {
    stream: Arc<OutboundStream>,
    store: Arc<ItemStore>,
    timeout: Duration,
}

impl CaptureCoordinator {
    /// Coordinator over a stream and persistence cache.
    pub fn new(stream: Arc<OutboundStream>, store: Arc<ItemStore>, timeout: Duration) -> Self {
        Self {
            stream,
            store,
            timeout,
        }
    }

    /// Execute one capture: freeze the stream, extract a frame within the
    /// timeout, resume, then persist and confirm the item.
    ///
    /// On timeout or extraction failure the stream has already resumed by
    /// the time the error is returned.
    #[instrument(skip(self))]
    pub async fn capture(&self) -> Result<Item, SessionError> {
        let frame = {
            let _guard = self.stream.pause();
            match time::timeout(self.timeout, self.extract_frame()).await {
                Ok(frame) => frame?,
                Err(_) => {
                    counter!("capture_timeouts_total").increment(1);
                    warn!(timeout_ms = self.timeout.as_millis() as u64, "capture timed out");
                    return Err(SessionError::CaptureTimeout);
                }
            }
            // Guard drops here: the stream resumes before persistence.
        };

        debug!(bytes = frame.len(), "frame extracted");
        let item = self.store.insert_confirmed(&frame).await?;
        counter!("captures_total").increment(1);
        Ok(item)
    }

    /// Wait for a usable frame from the paused stream.
    ///
    /// The frozen frame is usually available immediately; polling covers
    /// the window before the device's first frame.
    async fn extract_frame(&self) -> Result<RawFrame, SessionError> {
        loop {
            if let Some(frame) = self.stream.frame_for_capture() {
                if frame.is_empty() {
                    return Err(SessionError::CaptureExtraction("empty frame".into()));
                }
                return Ok(frame);
            }
            time::sleep(EXTRACTION_POLL).await;
        }
    }
}
