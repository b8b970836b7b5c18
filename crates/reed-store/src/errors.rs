//! Store errors.

use reed_core::item::LifecycleError;

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from the persistence collaborator or the item cache.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No item with the given identifier.
    #[error("item not found: {0}")]
    NotFound(String),

    /// Illegal lifecycle transition (terminal states accept nothing).
    #[error(transparent)]
    InvalidTransition(#[from] LifecycleError),

    /// Underlying persistence failure (database, file I/O, pool).
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}
