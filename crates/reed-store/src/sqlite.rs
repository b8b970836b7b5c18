//! SQLite-backed item repository.
//!
//! One `items` table plus JPEG files on disk. Lifecycle monotonicity is
//! enforced here as well as in the cache — the repository is the authority
//! and rejects transitions out of terminal states regardless of what the
//! caller believes the current state is.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, instrument};
use uuid::Uuid;

use reed_core::ids::ItemId;
use reed_core::item::{Item, ItemFields, ItemState, LifecycleError};
use reed_media::frame::RawFrame;

use crate::errors::{Result, StoreError};
use crate::repository::ItemRepository;

type Pool = r2d2::Pool<SqliteConnectionManager>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS items (
    id          TEXT PRIMARY KEY,
    filename    TEXT NOT NULL,
    name        TEXT,
    category    TEXT,
    state       TEXT NOT NULL DEFAULT 'CAPTURED',
    captured_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_items_captured_at ON items(captured_at DESC);
";

/// SQLite + on-disk JPEG implementation of [`ItemRepository`].
pub struct SqliteItemRepository {
    pool: Pool,
    image_dir: PathBuf,
}

impl SqliteItemRepository {
    /// Open (or create) the database at `db_path`, storing JPEG files
    /// under `image_dir`.
    pub fn open(db_path: &Path, image_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(image_dir)?;
        // Waiting briefly on a held write lock beats surfacing SQLITE_BUSY
        // for every overlapping pooled write.
        let manager = SqliteConnectionManager::file(db_path)
            .with_init(|conn| conn.busy_timeout(std::time::Duration::from_secs(5)));
        Self::with_manager(manager, image_dir)
    }

    /// In-memory database (tests). JPEG files still land in `image_dir`.
    pub fn open_in_memory(image_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(image_dir)?;
        // Single connection so every pooled handle sees the same memory DB.
        let manager = SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder().max_size(1).build(manager)?;
        Self::migrate_and_wrap(pool, image_dir)
    }

    fn with_manager(manager: SqliteConnectionManager, image_dir: &Path) -> Result<Self> {
        let pool = r2d2::Pool::builder().build(manager)?;
        Self::migrate_and_wrap(pool, image_dir)
    }

    fn migrate_and_wrap(pool: Pool, image_dir: &Path) -> Result<Self> {
        {
            let conn = pool.get()?;
            conn.execute_batch(SCHEMA)?;
        }
        Ok(Self {
            pool,
            image_dir: image_dir.to_path_buf(),
        })
    }

    fn get_row(conn: &Connection, id: &ItemId) -> Result<Option<Item>> {
        let item = conn
            .query_row(
                "SELECT id, filename, name, category, state, captured_at
                 FROM items WHERE id = ?1",
                params![id.as_str()],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    #[instrument(skip_all, fields(bytes = frame.len()))]
    async fn create_item(&self, frame: &RawFrame) -> Result<Item> {
        let id = format!("item_{}", Uuid::now_v7());
        let captured_at: DateTime<Utc> = frame.captured_at;
        let filename = format!("snapshot_{}.jpg", captured_at.format("%Y%m%d_%H%M%S_%6f"));

        std::fs::write(self.image_dir.join(&filename), &frame.data)?;

        let conn = self.pool.get()?;
        let _ = conn.execute(
            "INSERT INTO items (id, filename, name, category, state, captured_at)
             VALUES (?1, ?2, NULL, NULL, ?3, ?4)",
            params![
                id,
                filename,
                ItemState::Captured.as_str(),
                captured_at.to_rfc3339()
            ],
        )?;
        debug!(item_id = %id, filename, "item persisted");

        Ok(Item {
            id: ItemId::new(id),
            filename,
            name: None,
            category: None,
            state: ItemState::Captured,
            captured_at,
        })
    }

    #[instrument(skip_all, fields(item_id = %id))]
    async fn update_item(&self, id: &ItemId, fields: &ItemFields) -> Result<Item> {
        let conn = self.pool.get()?;
        let Some(current) = Self::get_row(&conn, id)? else {
            return Err(StoreError::NotFound(id.to_string()));
        };

        let name = fields.name.clone().or(current.name.clone());
        let category = fields.category.clone().or(current.category.clone());

        let Some(next) = fields.state else {
            // Metadata-only edit: the state column is left untouched so a
            // transition racing on another pooled connection is never
            // overwritten with this call's stale read.
            let changed = conn.execute(
                "UPDATE items SET name = ?1, category = ?2 WHERE id = ?3",
                params![name, category, id.as_str()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(id.to_string()));
            }
            return Self::get_row(&conn, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()));
        };

        if !current.state.can_transition_to(next) {
            return Err(StoreError::InvalidTransition(LifecycleError {
                from: current.state,
                to: next,
            }));
        }

        // Guarded write: applies only while the state is still the one
        // the legality check saw. A concurrent transition landing in
        // between changes zero rows here instead of overwriting a
        // terminal state.
        let changed = conn.execute(
            "UPDATE items SET name = ?1, category = ?2, state = ?3
             WHERE id = ?4 AND state = ?5",
            params![
                name,
                category,
                next.as_str(),
                id.as_str(),
                current.state.as_str()
            ],
        )?;
        if changed == 0 {
            return match Self::get_row(&conn, id)? {
                Some(now) => Err(StoreError::InvalidTransition(LifecycleError {
                    from: now.state,
                    to: next,
                })),
                None => Err(StoreError::NotFound(id.to_string())),
            };
        }

        Ok(Item {
            name,
            category,
            state: next,
            ..current
        })
    }

    async fn list_items(&self, limit: usize) -> Result<Vec<Item>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, filename, name, category, state, captured_at
             FROM items ORDER BY captured_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], row_to_item)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    let state_str: String = row.get(4)?;
    let captured_at_str: String = row.get(5)?;
    let state = ItemState::parse(&state_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown item state: {state_str}").into(),
        )
    })?;
    let captured_at = DateTime::parse_from_rfc3339(&captured_at_str)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?
        .with_timezone(&Utc);
    Ok(Item {
        id: ItemId::new(row.get::<_, String>(0)?),
        filename: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        state,
        captured_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn repo() -> (SqliteItemRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteItemRepository::open_in_memory(dir.path()).unwrap();
        (repo, dir)
    }

    fn frame() -> RawFrame {
        RawFrame::jpeg(vec![0xFF, 0xD8, 0xFF, 0xE0], 768, 768)
    }

    #[tokio::test]
    async fn create_assigns_id_and_writes_file() {
        let (repo, dir) = repo();
        let item = repo.create_item(&frame()).await.unwrap();

        assert!(item.id.as_str().starts_with("item_"));
        assert_eq!(item.state, ItemState::Captured);
        assert!(item.filename.starts_with("snapshot_"));
        assert!(dir.path().join(&item.filename).exists());
    }

    #[tokio::test]
    async fn list_is_most_recent_first() {
        let (repo, _dir) = repo();
        let mut early = frame();
        early.captured_at = Utc::now() - chrono::Duration::seconds(5);
        let a = repo.create_item(&early).await.unwrap();
        let b = repo.create_item(&frame()).await.unwrap();

        let items = repo.list_items(20).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, b.id);
        assert_eq!(items[1].id, a.id);
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let (repo, _dir) = repo();
        for _ in 0..3 {
            let _ = repo.create_item(&frame()).await.unwrap();
        }
        assert_eq!(repo.list_items(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_fields_round_trip() {
        let (repo, _dir) = repo();
        let item = repo.create_item(&frame()).await.unwrap();

        let updated = repo
            .update_item(
                &item.id,
                &ItemFields {
                    name: Some("receipt".into()),
                    category: Some("expenses".into()),
                    state: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("receipt"));
        assert_eq!(updated.category.as_deref(), Some("expenses"));
        assert_eq!(updated.state, ItemState::Captured);

        // Partial update leaves other fields alone.
        let updated = repo
            .update_item(&item.id, &ItemFields::state(ItemState::Used))
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("receipt"));
        assert_eq!(updated.state, ItemState::Used);
    }

    #[tokio::test]
    async fn terminal_state_rejects_transition() {
        let (repo, _dir) = repo();
        let item = repo.create_item(&frame()).await.unwrap();
        let _ = repo
            .update_item(&item.id, &ItemFields::state(ItemState::Used))
            .await
            .unwrap();

        let err = repo
            .update_item(&item.id, &ItemFields::state(ItemState::Discarded))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::InvalidTransition(_));

        // Stored state is unchanged.
        let items = repo.list_items(10).await.unwrap();
        assert_eq!(items[0].state, ItemState::Used);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (repo, _dir) = repo();
        let err = repo
            .update_item(&ItemId::from("missing"), &ItemFields::state(ItemState::Used))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::NotFound(id) if id == "missing");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_transitions_cannot_both_win() {
        use std::sync::Arc;

        // File-backed so the pool hands out distinct connections and the
        // two transitions genuinely race.
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(
            SqliteItemRepository::open(&dir.path().join("reed.db"), &dir.path().join("images"))
                .unwrap(),
        );
        let item = repo.create_item(&frame()).await.unwrap();

        let used = {
            let repo = Arc::clone(&repo);
            let id = item.id.clone();
            tokio::spawn(
                async move { repo.update_item(&id, &ItemFields::state(ItemState::Used)).await },
            )
        };
        let discarded = {
            let repo = Arc::clone(&repo);
            let id = item.id.clone();
            tokio::spawn(async move {
                repo.update_item(&id, &ItemFields::state(ItemState::Discarded))
                    .await
            })
        };
        let used = used.await.unwrap();
        let discarded = discarded.await.unwrap();

        // Exactly one transition wins; the loser is rejected instead of
        // overwriting the terminal state.
        assert!(used.is_ok() != discarded.is_ok());
        let loser = if used.is_ok() { &discarded } else { &used };
        assert_matches!(loser.as_ref().unwrap_err(), StoreError::InvalidTransition(_));

        let stored = &repo.list_items(1).await.unwrap()[0];
        let winner = if used.is_ok() {
            ItemState::Used
        } else {
            ItemState::Discarded
        };
        assert_eq!(stored.state, winner);
    }

    #[tokio::test]
    async fn stale_guard_rejects_without_overwriting() {
        // Same lost-update shape as two racing connections, forced
        // deterministically: the second transition's legality check runs
        // against a state that changes before its write would land.
        let (repo, _dir) = repo();
        let item = repo.create_item(&frame()).await.unwrap();
        let _ = repo
            .update_item(&item.id, &ItemFields::state(ItemState::Used))
            .await
            .unwrap();

        let err = repo
            .update_item(&item.id, &ItemFields::state(ItemState::Discarded))
            .await
            .unwrap_err();
        assert_matches!(
            err,
            StoreError::InvalidTransition(LifecycleError {
                from: ItemState::Used,
                to: ItemState::Discarded,
            })
        );

        // A metadata edit after the transition leaves the state alone.
        let renamed = repo
            .update_item(
                &item.id,
                &ItemFields {
                    name: Some("kept".into()),
                    category: None,
                    state: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name.as_deref(), Some("kept"));
        assert_eq!(renamed.state, ItemState::Used);
    }

    #[tokio::test]
    async fn open_creates_db_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("reed.db");
        let repo = SqliteItemRepository::open(&db, &dir.path().join("images")).unwrap();
        let _ = repo.create_item(&frame()).await.unwrap();
        assert!(db.exists());
    }
}
