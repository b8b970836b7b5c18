//! # reed-media
//!
//! Media primitives for the Reed live-capture orchestrator:
//!
//! - **Frames**: [`frame::RawFrame`] — an encoded still frame
//! - **Acquisition**: [`source::MediaGateway`] and the
//!   [`source::VideoSource`]/[`source::AudioSource`] device seams
//! - **Outbound stream**: [`stream::OutboundStream`] — the single
//!   mutually-exclusive outbound media resource, with RAII pause guards
//!
//! ## Crate Position
//!
//! Depends on: reed-core. Depended on by: reed-store (frame payloads),
//! reed-session (stream ownership, capture pausing).

#![deny(unsafe_code)]

pub mod errors;
pub mod frame;
pub mod source;
pub mod stream;

pub use errors::MediaError;
pub use frame::RawFrame;
pub use source::{AudioSource, MediaGateway, MediaHandles, VideoSource};
pub use stream::{OutboundStream, PauseGuard};
