//! # reed-settings
//!
//! Configuration for the Reed live-capture orchestrator.
//!
//! Settings are loaded from two layers (in priority order):
//! 1. **Compiled defaults** — [`ReedSettings::default()`]
//! 2. **Environment variables** — `REED_*` overrides (highest priority)
//!
//! The defaults carry the media constants the live session contract
//! expects: 16 kHz PCM input / 24 kHz PCM output, 768×768 video at 1 fps,
//! JPEG quality 85.

#![deny(unsafe_code)]

pub mod loader;
pub mod types;

pub use loader::{apply_overrides, load_settings};
pub use types::{
    AudioSettings, CaptureSettings, ReedSettings, SessionSettings, StorageSettings, VideoSettings,
};
