//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so partial
//! JSON is accepted — missing fields get their production default.

use serde::{Deserialize, Serialize};

/// Root settings type for Reed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReedSettings {
    /// Settings schema version.
    pub version: String,
    /// Audio stream parameters.
    pub audio: AudioSettings,
    /// Video stream parameters.
    pub video: VideoSettings,
    /// Capture timing.
    pub capture: CaptureSettings,
    /// Session lifecycle and reconnect policy.
    pub session: SessionSettings,
    /// Item persistence paths.
    pub storage: StorageSettings,
}

impl Default for ReedSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            audio: AudioSettings::default(),
            video: VideoSettings::default(),
            capture: CaptureSettings::default(),
            session: SessionSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

/// Audio stream parameters (16-bit PCM, little-endian, mono).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioSettings {
    /// Microphone input sample rate in Hz.
    pub input_rate: u32,
    /// Playback output sample rate in Hz.
    pub output_rate: u32,
    /// Samples per submitted chunk.
    pub chunk_size: u32,
    /// Channel count.
    pub channels: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            input_rate: 16_000,
            output_rate: 24_000,
            chunk_size: 4_200,
            channels: 1,
        }
    }
}

/// Video stream parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSettings {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Outbound frame rate. The live session contract processes 1 fps.
    pub fps: u32,
    /// JPEG encode quality (0–100).
    pub jpeg_quality: u8,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: 768,
            height: 768,
            fps: 1,
            jpeg_quality: 85,
        }
    }
}

/// Capture timing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureSettings {
    /// Bound on frame extraction while the stream is paused, in
    /// milliseconds. Expiry fails the capture and resumes streaming.
    pub timeout_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self { timeout_ms: 3_000 }
    }
}

/// Session lifecycle and reconnect policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Fixed backoff before a reconnect attempt, in milliseconds.
    pub reconnect_backoff_ms: u64,
    /// Reconnect attempts before a transport failure is fatal.
    pub reconnect_max_retries: u32,
    /// Provider-side session duration cap, in minutes.
    pub max_duration_minutes: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reconnect_backoff_ms: 2_000,
            reconnect_max_retries: 1,
            max_duration_minutes: 10,
        }
    }
}

/// Item persistence paths.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// SQLite database path.
    pub db_path: String,
    /// Directory for captured JPEG files.
    pub image_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            db_path: "reed.db".to_string(),
            image_dir: "images".to_string(),
        }
    }
}
