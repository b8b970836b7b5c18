//! In-memory item repository.
//!
//! Same contract as the SQLite implementation, no pool and no files.
//! Identifiers are small sequential integers, matching the original
//! backend's autoincrement behavior.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use reed_core::ids::ItemId;
use reed_core::item::{Item, ItemFields, ItemState, LifecycleError};
use reed_media::frame::RawFrame;

use crate::errors::{Result, StoreError};
use crate::repository::ItemRepository;

/// Pool-free [`ItemRepository`] for tests and hydration exercises.
#[derive(Default)]
pub struct InMemoryItemRepository {
    items: Mutex<Vec<Item>>,
    next_id: AtomicU64,
}

impl InMemoryItemRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Seed an item directly (test setup for hydration).
    pub fn seed(&self, item: Item) {
        self.items.lock().push(item);
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create_item(&self, frame: &RawFrame) -> Result<Item> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = Item {
            id: ItemId::new(id.to_string()),
            filename: format!("snapshot_{id}.jpg"),
            name: None,
            category: None,
            state: ItemState::Captured,
            captured_at: frame.captured_at,
        };
        self.items.lock().push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: &ItemId, fields: &ItemFields) -> Result<Item> {
        let mut items = self.items.lock();
        let Some(item) = items.iter_mut().find(|i| &i.id == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        if let Some(next) = fields.state {
            if !item.state.can_transition_to(next) {
                return Err(StoreError::InvalidTransition(LifecycleError {
                    from: item.state,
                    to: next,
                }));
            }
            item.state = next;
        }
        if let Some(name) = &fields.name {
            item.name = Some(name.clone());
        }
        if let Some(category) = &fields.category {
            item.category = Some(category.clone());
        }
        Ok(item.clone())
    }

    async fn list_items(&self, limit: usize) -> Result<Vec<Item>> {
        let mut items = self.items.lock().clone();
        items.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        items.truncate(limit);
        Ok(items)
    }
}
