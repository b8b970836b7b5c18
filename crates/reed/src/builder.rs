//! Wiring: builds a [`Reed`] from its platform seams.
//!
//! The builder assembles the fixed topology: the view sync bus is the
//! event sink for both the item store and the session orchestrator, the
//! store wraps the supplied repository, and the orchestrator owns the
//! stream and transport. Callers only provide the seams the platform
//! must implement.

use std::sync::Arc;

use tokio::sync::mpsc;

use reed_core::capture::CaptureRequest;
use reed_core::events::EventSink;
use reed_core::ids::ItemId;
use reed_core::item::{Item, ItemFields, ItemState};
use reed_core::orb::OrbState;
use reed_core::phase::SessionPhase;
use reed_media::source::MediaGateway;
use reed_session::errors::SessionError;
use reed_session::orchestrator::SessionOrchestrator;
use reed_session::transport::{LiveEvent, LiveTransport};
use reed_settings::loader::load_settings;
use reed_settings::types::ReedSettings;
use reed_store::errors::StoreError;
use reed_store::repository::ItemRepository;
use reed_store::store::ItemStore;
use reed_sync::bus::{SubscriptionId, ViewSurface, ViewSyncBus};
use reed_sync::view::{ViewState, WindowGeometry};

/// A required collaborator was not supplied to the builder.
#[derive(Debug, thiserror::Error)]
#[error("missing collaborator: {0}")]
pub struct BuildError(pub &'static str);

/// Builder for [`Reed`].
#[derive(Default)]
pub struct ReedBuilder {
    settings: Option<ReedSettings>,
    media: Option<Arc<dyn MediaGateway>>,
    transport: Option<Arc<dyn LiveTransport>>,
    geometry: Option<Arc<dyn WindowGeometry>>,
    repository: Option<Arc<dyn ItemRepository>>,
}

impl ReedBuilder {
    /// Use explicit settings instead of defaults + `REED_*` overrides.
    pub fn settings(mut self, settings: ReedSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Camera/microphone acquisition seam. Required.
    pub fn media(mut self, media: Arc<dyn MediaGateway>) -> Self {
        self.media = Some(media);
        self
    }

    /// Live conversational transport. Required.
    pub fn transport(mut self, transport: Arc<dyn LiveTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Window geometry provider for presentation decisions. Required.
    pub fn geometry(mut self, geometry: Arc<dyn WindowGeometry>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Item persistence collaborator. Required.
    pub fn repository(mut self, repository: Arc<dyn ItemRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Assemble the system.
    pub fn build(self) -> Result<Reed, BuildError> {
        let settings = self.settings.unwrap_or_else(load_settings);
        let media = self.media.ok_or(BuildError("media gateway"))?;
        let transport = self.transport.ok_or(BuildError("live transport"))?;
        let geometry = self.geometry.ok_or(BuildError("window geometry"))?;
        let repository = self.repository.ok_or(BuildError("item repository"))?;

        let bus = Arc::new(ViewSyncBus::new(geometry));
        let store = Arc::new(ItemStore::new(
            repository,
            Arc::clone(&bus) as Arc<dyn EventSink>,
        ));
        let orchestrator = Arc::new(SessionOrchestrator::new(
            settings,
            media,
            transport,
            Arc::clone(&store),
            Arc::clone(&bus) as Arc<dyn EventSink>,
        ));

        Ok(Reed {
            orchestrator,
            bus,
            store,
        })
    }
}

/// The assembled orchestrator, cache, and view sync bus for one session.
pub struct Reed {
    orchestrator: Arc<SessionOrchestrator>,
    bus: Arc<ViewSyncBus>,
    store: Arc<ItemStore>,
}

impl Reed {
    /// Start building a [`Reed`].
    pub fn builder() -> ReedBuilder {
        ReedBuilder::default()
    }

    /// The session orchestrator.
    pub fn orchestrator(&self) -> &Arc<SessionOrchestrator> {
        &self.orchestrator
    }

    /// The view sync bus.
    pub fn bus(&self) -> &Arc<ViewSyncBus> {
        &self.bus
    }

    /// The item cache.
    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    /// Hydrate the item cache, then acquire devices and connect. Returns
    /// the inbound event channel to hand to [`run`](Self::run).
    pub async fn start(&self) -> Result<mpsc::Receiver<LiveEvent>, SessionError> {
        self.store.hydrate().await?;
        self.orchestrator.start().await
    }

    /// Drive the session until it stops.
    pub async fn run(&self, events: mpsc::Receiver<LiveEvent>) {
        self.orchestrator.run(events).await;
    }

    /// Stop the session and release all resources.
    pub async fn stop(&self) {
        self.orchestrator.stop().await;
    }

    /// Trigger a local capture (the capture button).
    pub async fn capture(&self) -> Result<Item, SessionError> {
        self.orchestrator.request_capture(CaptureRequest::local()).await
    }

    /// Submit one microphone chunk.
    pub async fn send_audio_chunk(&self, chunk: &[u8]) -> Result<(), SessionError> {
        self.orchestrator.send_audio_chunk(chunk).await
    }

    /// Suppress or restore outbound audio.
    pub fn set_muted(&self, muted: bool) {
        self.orchestrator.set_muted(muted);
    }

    /// Mark an item consumed by the conversation.
    pub async fn mark_used(&self, id: &ItemId) -> Result<Item, StoreError> {
        self.store.transition(id, ItemState::Used).await
    }

    /// Mark an item rejected.
    pub async fn mark_discarded(&self, id: &ItemId) -> Result<Item, StoreError> {
        self.store.transition(id, ItemState::Discarded).await
    }

    /// Edit an item's metadata (name/category).
    pub async fn update_item(&self, id: &ItemId, fields: ItemFields) -> Result<Item, StoreError> {
        self.store.update(id, fields).await
    }

    /// Mount a view surface.
    pub fn subscribe(&self, surface: Arc<dyn ViewSurface>) -> SubscriptionId {
        self.bus.subscribe(surface)
    }

    /// Unmount a view surface.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.orchestrator.phase()
    }

    /// Current orb state.
    pub fn orb_state(&self) -> OrbState {
        self.orchestrator.orb_state()
    }

    /// Current derived view state.
    pub fn view_state(&self) -> ViewState {
        self.bus.view_state()
    }
}
