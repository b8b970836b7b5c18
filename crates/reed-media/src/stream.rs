//! The single outbound media stream.
//!
//! [`OutboundStream`] is the only mutually-exclusive media resource in the
//! system. Video is paused exclusively through RAII [`PauseGuard`]s so the
//! stream resumes on every exit path, including capture failure. Audio is
//! never paused by a capture — only the mute flag suppresses it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::frame::RawFrame;
use crate::source::VideoSource;

/// The outbound audio/video stream for one session.
pub struct OutboundStream {
    video: Arc<dyn VideoSource>,
    pause_depth: AtomicUsize,
    muted: AtomicBool,
    /// Frame frozen at pause time. Cleared when the last guard drops.
    frozen: Mutex<Option<RawFrame>>,
    frames_submitted: AtomicU64,
}

impl OutboundStream {
    /// Wrap an acquired video source.
    pub fn new(video: Arc<dyn VideoSource>) -> Self {
        Self {
            video,
            pause_depth: AtomicUsize::new(0),
            muted: AtomicBool::new(false),
            frozen: Mutex::new(None),
            frames_submitted: AtomicU64::new(0),
        }
    }

    /// Pause outbound video, freezing the current frame.
    ///
    /// Returns a guard that resumes the stream when dropped. Audio is
    /// unaffected — conversational continuity requires it to keep flowing.
    pub fn pause(self: &Arc<Self>) -> PauseGuard {
        if self.pause_depth.fetch_add(1, Ordering::SeqCst) == 0 {
            *self.frozen.lock() = self.video.current_frame();
            debug!("outbound video paused");
        }
        PauseGuard {
            stream: Arc::clone(self),
        }
    }

    /// Whether outbound video is currently paused.
    pub fn is_paused(&self) -> bool {
        self.pause_depth.load(Ordering::SeqCst) > 0
    }

    /// Suppress audio submission without touching video.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    /// Whether audio submission is suppressed.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    /// Next frame to submit outbound, or `None` while paused (or before
    /// the device has produced a frame).
    pub fn next_frame(&self) -> Option<RawFrame> {
        if self.is_paused() {
            return None;
        }
        let frame = self.video.current_frame();
        if frame.is_some() {
            let _ = self.frames_submitted.fetch_add(1, Ordering::Relaxed);
        }
        frame
    }

    /// Frame for a snapshot capture: the frozen frame while paused,
    /// otherwise the live current frame.
    pub fn frame_for_capture(&self) -> Option<RawFrame> {
        if self.is_paused() {
            if let Some(frame) = self.frozen.lock().clone() {
                return Some(frame);
            }
            // The device had nothing at pause time; fall through to the
            // live frame in case one has arrived since.
            return self.video.current_frame();
        }
        self.video.current_frame()
    }

    /// Total frames handed out for outbound submission.
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted.load(Ordering::Relaxed)
    }

    fn resume(&self) {
        if self.pause_depth.fetch_sub(1, Ordering::SeqCst) == 1 {
            *self.frozen.lock() = None;
            debug!("outbound video resumed");
        }
    }
}

/// RAII pause guard — resumes the stream when dropped.
pub struct PauseGuard {
    stream: Arc<OutboundStream>,
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        self.stream.resume();
    }
}
