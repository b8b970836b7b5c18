//! # reed-core
//!
//! Foundation types for the Reed live-capture orchestrator.
//!
//! This crate provides the shared vocabulary that all other Reed crates
//! depend on:
//!
//! - **Branded IDs**: [`ids::SessionId`], [`ids::ItemId`],
//!   [`ids::CorrelationToken`] as newtypes
//! - **Items**: [`item::Item`] with the CAPTURED → USED/DISCARDED lifecycle
//! - **Session phases**: [`phase::SessionPhase`] and its legal transitions
//! - **Orb**: [`orb::OrbStateMachine`] deriving the 3-state activity indicator
//! - **Events**: [`events::ReedEvent`] tagged variants delivered to view
//!   surfaces, and the [`events::EventSink`] fan-out seam
//! - **Capture requests**: [`capture::CaptureRequest`] and
//!   [`capture::CaptureOrigin`]
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other reed crates.

#![deny(unsafe_code)]

pub mod capture;
pub mod events;
pub mod ids;
pub mod item;
pub mod orb;
pub mod phase;

pub use capture::{CaptureOrigin, CaptureRequest};
pub use events::{EventSink, NullSink, ReedEvent};
pub use ids::{CorrelationToken, ItemId, SessionId};
pub use item::{Item, ItemFields, ItemState, LifecycleError};
pub use orb::{AudioActivity, OrbState, OrbStateMachine};
pub use phase::SessionPhase;
