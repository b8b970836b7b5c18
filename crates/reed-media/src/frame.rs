//! Encoded still frames.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// An encoded still frame taken from the video source.
///
/// Frames arrive already encoded (JPEG by contract with the video source);
/// codec and resampling details live behind the source seam.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    /// Encoded image bytes.
    pub data: Bytes,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// MIME type of `data` (`image/jpeg` unless the source says otherwise).
    pub mime_type: String,
    /// When the frame was read from the device.
    pub captured_at: DateTime<Utc>,
}

impl RawFrame {
    /// A JPEG frame captured now.
    pub fn jpeg(data: impl Into<Bytes>, width: u32, height: u32) -> Self {
        Self {
            data: data.into(),
            width,
            height,
            mime_type: "image/jpeg".to_string(),
            captured_at: Utc::now(),
        }
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
