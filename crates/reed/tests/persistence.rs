//! Item persistence through the SQLite repository, end to end.

use std::sync::Arc;

use assert_matches::assert_matches;

use reed::{EventSink, ItemFields, ItemState, RawFrame, SqliteItemRepository, StoreError};
use reed_core::events::NullSink;
use reed_store::repository::ItemRepository;
use reed_store::store::ItemStore;

fn frame() -> RawFrame {
    RawFrame::jpeg(vec![0xFF, 0xD8, 0xFF, 0xE0], 768, 768)
}

#[tokio::test]
async fn items_survive_a_cache_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(
        SqliteItemRepository::open(&dir.path().join("reed.db"), &dir.path().join("images"))
            .unwrap(),
    );

    let store = ItemStore::new(
        Arc::clone(&repo) as Arc<dyn ItemRepository>,
        Arc::new(NullSink) as Arc<dyn EventSink>,
    );
    let item = store.insert_confirmed(&frame()).await.unwrap();
    let _ = store
        .update(
            &item.id,
            ItemFields {
                name: Some("whiteboard".into()),
                ..ItemFields::default()
            },
        )
        .await
        .unwrap();

    // A fresh cache over the same database sees the confirmed state.
    let rebuilt = ItemStore::new(
        repo as Arc<dyn ItemRepository>,
        Arc::new(NullSink) as Arc<dyn EventSink>,
    );
    rebuilt.hydrate().await.unwrap();
    let hydrated = rebuilt.get(&item.id).unwrap();
    assert_eq!(hydrated.name.as_deref(), Some("whiteboard"));
    assert_eq!(hydrated.state, ItemState::Captured);

    // The JPEG landed on disk under the image directory.
    let image = dir.path().join("images").join(&hydrated.filename);
    assert!(image.is_file());
}

#[tokio::test]
async fn lifecycle_rules_hold_at_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(
        SqliteItemRepository::open(&dir.path().join("reed.db"), &dir.path().join("images"))
            .unwrap(),
    );
    let store = ItemStore::new(
        repo as Arc<dyn ItemRepository>,
        Arc::new(NullSink) as Arc<dyn EventSink>,
    );

    let item = store.insert_confirmed(&frame()).await.unwrap();
    let _ = store.transition(&item.id, ItemState::Discarded).await.unwrap();

    let err = store.transition(&item.id, ItemState::Used).await.unwrap_err();
    assert_matches!(err, StoreError::InvalidTransition(_));
}
