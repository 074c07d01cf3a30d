//! Local persistence for the tracker snapshot.

mod memory;
mod payload;
mod sqlite;

pub use memory::MemoryStore;
pub use payload::{Payload, StorageRecord, STORAGE_VERSION};
pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::models::AppState;

/// Storage errors. Loading never surfaces these; a failed save is reported
/// once and never retried by the core.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Contract between the tracker core and whatever holds the snapshot.
///
/// `load` must never fail: malformed or missing underlying data degrades to
/// the structurally-defaulted empty state, with malformed records dropped
/// individually rather than failing the whole snapshot.
pub trait StorageAdapter {
    /// Load the sanitized snapshot.
    fn load(&self) -> AppState;

    /// Persist the snapshot.
    fn save(&self, state: &AppState) -> StoreResult<()>;
}
