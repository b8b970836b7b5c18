//! The client-side item cache.
//!
//! [`ItemStore`] is a read-through cache over the persistence
//! collaborator. Every mutation is confirm-then-apply: the round trip
//! happens first, the cache and the event fan-out only see what came back.
//! On failure the cache is untouched. Events are published in confirmation
//! order — the store never reorders to match request order.

use std::sync::Arc;

use metrics::counter;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use reed_core::events::{EventSink, ReedEvent};
use reed_core::ids::ItemId;
use reed_core::item::{Item, ItemFields, ItemState, LifecycleError};
use reed_media::frame::RawFrame;

use crate::errors::{Result, StoreError};
use crate::repository::ItemRepository;

/// How many items to pull on hydration.
const HYDRATION_LIMIT: usize = 20;

/// Ordered-by-recency cache of confirmed items.
pub struct ItemStore {
    repo: Arc<dyn ItemRepository>,
    sink: Arc<dyn EventSink>,
    items: Mutex<Vec<Item>>,
}

impl ItemStore {
    /// New empty cache over a repository, publishing changes to `sink`.
    pub fn new(repo: Arc<dyn ItemRepository>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            repo,
            sink,
            items: Mutex::new(Vec::new()),
        }
    }

    /// Replace the cache with the repository's current listing
    /// (most-recent first). Used once on startup before the first event.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<()> {
        let items = self.repo.list_items(HYDRATION_LIMIT).await?;
        debug!(count = items.len(), "item cache hydrated");
        *self.items.lock() = items;
        Ok(())
    }

    /// Snapshot of the cached items, most-recent first.
    pub fn items(&self) -> Vec<Item> {
        self.items.lock().clone()
    }

    /// Cached item by id.
    pub fn get(&self, id: &ItemId) -> Option<Item> {
        self.items.lock().iter().find(|i| &i.id == id).cloned()
    }

    /// Number of cached items.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// True when the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Persist a captured frame and, once confirmed, insert the item and
    /// publish `ItemCreated`. The item is visible nowhere until the
    /// repository has assigned its identifier.
    #[instrument(skip_all, fields(bytes = frame.len()))]
    pub async fn insert_confirmed(&self, frame: &RawFrame) -> Result<Item> {
        let item = self.repo.create_item(frame).await?;
        counter!("items_created_total").increment(1);
        self.upsert(item.clone());
        self.sink.publish(ReedEvent::ItemCreated { item: item.clone() });
        Ok(item)
    }

    /// Request a lifecycle transition through the repository; apply and
    /// publish only on confirmation.
    ///
    /// A transition the cache already knows to be illegal is rejected
    /// without a round trip; the repository remains the authority for
    /// everything else.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn transition(&self, id: &ItemId, state: ItemState) -> Result<Item> {
        if let Some(cached) = self.get(id) {
            if !cached.state.can_transition_to(state) {
                return Err(StoreError::InvalidTransition(LifecycleError {
                    from: cached.state,
                    to: state,
                }));
            }
        }
        self.apply_update(id, &ItemFields::state(state)).await
    }

    /// Confirm-then-apply metadata edits (name/category).
    #[instrument(skip(self, fields), fields(item_id = %id))]
    pub async fn update(&self, id: &ItemId, fields: ItemFields) -> Result<Item> {
        self.apply_update(id, &fields).await
    }

    /// Insert or replace a confirmed item and re-sort by recency.
    pub fn upsert(&self, item: Item) {
        let mut items = self.items.lock();
        items.retain(|i| i.id != item.id);
        items.push(item);
        items.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    }

    async fn apply_update(&self, id: &ItemId, fields: &ItemFields) -> Result<Item> {
        let item = self.repo.update_item(id, fields).await?;
        counter!("items_updated_total").increment(1);
        self.upsert(item.clone());
        self.sink.publish(ReedEvent::ItemUpdated {
            id: id.clone(),
            item: item.clone(),
        });
        Ok(item)
    }
}
