//! SQLite-backed snapshot store.
//!
//! The whole application state is one JSON document in a single-row table;
//! the document carries its own version (see [`super::payload`]).

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::{payload, StorageAdapter, StoreResult};
use crate::models::AppState;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS snapshot (
    slot TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

const SLOT: &str = "tracker";

/// Snapshot store over a local SQLite file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a store at the given path, creating the file if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn read_raw(&self) -> Option<String> {
        self.conn
            .query_row(
                "SELECT payload FROM snapshot WHERE slot = ?",
                [SLOT],
                |row| row.get(0),
            )
            .optional()
            .ok()
            .flatten()
    }
}

impl StorageAdapter for SqliteStore {
    fn load(&self) -> AppState {
        match self.read_raw() {
            Some(raw) => payload::from_json(&raw),
            None => AppState::default(),
        }
    }

    fn save(&self, state: &AppState) -> StoreResult<()> {
        let json = serde_json::to_string(&payload::to_payload(state))?;
        self.conn.execute(
            r#"
            INSERT INTO snapshot (slot, payload, saved_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                saved_at = datetime('now')
            "#,
            params![SLOT, json],
        )?;
        Ok(())
    }
}
