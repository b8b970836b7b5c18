//! The persistence collaborator capability.
//!
//! Items are conceptually owned by this collaborator. The cache only ever
//! holds what a repository method has returned — a confirmed round trip is
//! the sole way an item or a mutation becomes visible anywhere.

use async_trait::async_trait;

use reed_core::ids::ItemId;
use reed_core::item::{Item, ItemFields};
use reed_media::frame::RawFrame;

use crate::errors::Result;

/// Persistence capability for captured items.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a raw frame as a new item.
    ///
    /// Assigns the identifier; the item comes back in `CAPTURED` state.
    async fn create_item(&self, frame: &RawFrame) -> Result<Item>;

    /// Apply field and/or lifecycle updates to an existing item.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) for
    /// an unknown identifier and
    /// [`StoreError::InvalidTransition`](crate::StoreError::InvalidTransition)
    /// for a lifecycle change out of a terminal state.
    async fn update_item(&self, id: &ItemId, fields: &ItemFields) -> Result<Item>;

    /// List items, most-recent first, up to `limit`.
    async fn list_items(&self, limit: usize) -> Result<Vec<Item>>;
}
