//! # reed-session
//!
//! The session orchestration core:
//!
//! - **[`SessionOrchestrator`]**: owns the single outbound media stream for
//!   the lifetime of a session and arbitrates all capture triggers against
//!   it — at most one capture in flight, ever
//! - **[`CaptureCoordinator`]**: pause → extract → resume → persist, with a
//!   bounded extraction timeout
//! - **[`LiveTransport`]**: the remote conversational session seam
//!   (outbound frames, inbound live events, tool-result acknowledgment)
//! - **[`AckTracker`]**: exactly-once acknowledgment bookkeeping for remote
//!   tool invocations
//!
//! ## Crate Position
//!
//! Aggregation layer. Depends on: reed-core, reed-media, reed-store,
//! reed-settings. Depended on by: reed (facade).

#![deny(unsafe_code)]

pub mod ack;
pub mod capture;
pub mod errors;
pub mod orchestrator;
pub mod transport;

pub use ack::AckTracker;
pub use capture::CaptureCoordinator;
pub use errors::SessionError;
pub use orchestrator::SessionOrchestrator;
pub use transport::{LiveEvent, LiveTransport, ToolOutcome, TransportError};
