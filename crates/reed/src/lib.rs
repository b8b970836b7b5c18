//! # reed
//!
//! Unified entry point for the Reed live capture orchestrator: one live
//! audio/video conversation with a remote model, interrupt-driven
//! snapshot captures, a confirmed-item lifecycle, and synchronized view
//! surfaces.
//!
//! [`Reed`] wires the collaborators together; callers supply the
//! platform seams (device gateway, live transport, window geometry,
//! persistence) and drive the session:
//!
//! ```ignore
//! let reed = Reed::builder()
//!     .media(gateway)
//!     .transport(transport)
//!     .geometry(geometry)
//!     .repository(repo)
//!     .build()?;
//! let events = reed.start().await?;
//! reed.run(events).await;
//! ```

#![deny(unsafe_code)]

pub mod builder;
pub mod telemetry;

pub use builder::{BuildError, Reed, ReedBuilder};

pub use reed_core::{
    AudioActivity, CaptureOrigin, CaptureRequest, CorrelationToken, EventSink, Item, ItemFields,
    ItemId, ItemState, LifecycleError, OrbState, ReedEvent, SessionId, SessionPhase,
};
pub use reed_media::frame::RawFrame;
pub use reed_media::source::{AudioSource, MediaGateway, MediaHandles, VideoSource};
pub use reed_session::errors::SessionError;
pub use reed_session::transport::{LiveEvent, LiveTransport, ToolOutcome, TransportError};
pub use reed_settings::types::ReedSettings;
pub use reed_store::errors::StoreError;
pub use reed_store::repository::ItemRepository;
pub use reed_store::sqlite::SqliteItemRepository;
pub use reed_sync::bus::{SubscriptionId, SurfaceError, ViewSurface, ViewSyncBus};
pub use reed_sync::view::{Orientation, ViewState, WindowGeometry};
