//! # reed-store
//!
//! Item persistence and the client-side item cache.
//!
//! - **[`ItemRepository`]**: the persistence collaborator capability —
//!   `create_item` / `update_item` / `list_items`
//! - **[`SqliteItemRepository`]**: SQLite + on-disk JPEG implementation
//! - **[`InMemoryItemRepository`]**: pool-free implementation for tests
//! - **[`ItemStore`]**: ordered-by-recency cache, synchronized by explicit
//!   confirmation — it never guesses server state
//!
//! ## Crate Position
//!
//! Depends on: reed-core, reed-media. Depended on by: reed-session.

#![deny(unsafe_code)]

pub mod errors;
pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod store;

pub use errors::{Result, StoreError};
pub use memory::InMemoryItemRepository;
pub use repository::ItemRepository;
pub use sqlite::SqliteItemRepository;
pub use store::ItemStore;
