//! In-memory snapshot store, for tests and hosts that bring their own
//! storage medium.

use std::sync::Mutex;

use super::{payload, StorageAdapter, StoreResult};
use crate::models::AppState;

/// Snapshot store over an in-memory slot.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw snapshot text, as if persisted earlier.
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Mutex::new(Some(raw.to_string())),
        }
    }

    /// The raw snapshot text currently held, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageAdapter for MemoryStore {
    fn load(&self) -> AppState {
        match self.lock().as_deref() {
            Some(raw) => payload::from_json(raw),
            None => AppState::default(),
        }
    }

    fn save(&self, state: &AppState) -> StoreResult<()> {
        let json = serde_json::to_string(&payload::to_payload(state))?;
        *self.lock() = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Country;

    #[test]
    fn test_empty_store_loads_default() {
        assert_eq!(MemoryStore::new().load(), AppState::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = MemoryStore::new();
        let state = AppState {
            country: Some(Country::De),
            is_country_confirmed: true,
            records: vec![],
        };
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
        assert!(store.raw().is_some());
    }

    #[test]
    fn test_seeded_garbage_loads_default() {
        let store = MemoryStore::with_raw("definitely not json");
        assert_eq!(store.load(), AppState::default());
    }
}
