//! # reed-sync
//!
//! Fan-out of item/session/orb state changes to all mounted view surfaces.
//!
//! - **[`ViewSyncBus`]**: synchronous, in-registration-order delivery with
//!   per-subscriber fault isolation
//! - **[`ViewState`]**: derived presentation state (orientation, drawer,
//!   alert) — recomputed from events, never persisted
//! - **Presentation policy**: a new confirmed item opens the drawer in
//!   landscape or shows the alert in portrait — exactly one, decided by
//!   orientation at delivery time
//!
//! ## Crate Position
//!
//! Depends on: reed-core. Implements [`reed_core::events::EventSink`] so
//! state owners publish without depending on the view layer.

#![deny(unsafe_code)]

pub mod bus;
pub mod view;

pub use bus::{SubscriptionId, SurfaceError, ViewSurface, ViewSyncBus};
pub use view::{Orientation, ViewState, WindowGeometry};
