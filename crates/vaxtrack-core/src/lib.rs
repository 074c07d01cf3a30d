//! Vaxtrack Core Library
//!
//! Local-first personal vaccination record tracker: an append-only
//! completed-dose history per disease, manual and recurring future-dose
//! schedules, and a computed "next due" date per disease. All state lives
//! in a local snapshot; there is no server component.
//!
//! # Architecture
//!
//! ```text
//! submission ──▶ validate ──▶ reconcile ──▶ AppState ──▶ store.save
//!                                              │
//!                                              ▼
//!                                       schedule / view
//!                                   (next-due projections)
//! ```
//!
//! # Core Principle
//!
//! **The repeat-rule projection is always recomputed from the latest
//! factual completion.** Correcting a late completion reschedules the next
//! occurrence; nothing drifts from an originally planned date.
//!
//! # Modules
//!
//! - [`calendar`]: ISO date validation and clamping month arithmetic
//! - [`models`]: domain types (doses, series, catalog, state)
//! - [`schedule`]: next-due resolution (manual plans, repeat rules)
//! - [`validate`]: submission validation with stable error codes
//! - [`reconcile`]: record creation, editing, and dose reconciliation
//! - [`view`]: UI-ready projections
//! - [`store`]: sanitizing local persistence

pub mod calendar;
pub mod models;
pub mod reconcile;
pub mod schedule;
pub mod store;
pub mod validate;
pub mod view;

// Re-export commonly used types
pub use models::{
    AppState, CompletedDose, Country, Disease, DiseaseCatalog, DiseaseCategory, DoseKind,
    ImmunizationSeries, PlannedDose, RepeatRule, RepeatUnit,
};
pub use schedule::{resolve_next_due, DueSource, NextDue};
pub use store::{MemoryStore, SqliteStore, StorageAdapter, StoreError};
pub use validate::{DoseInput, PlannedDoseInput, RecordInput, RepeatInput, ValidationError};
pub use view::{CategoryCounts, RecordView};

use thiserror::Error;

/// Top-level session errors.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A submission was rejected; the state is unchanged.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The state mutated but the snapshot write failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Application session: the single owner of domain state.
///
/// There is no ambient global — hosts construct a `Tracker` from a storage
/// adapter and route every user action through it. State is loaded once at
/// construction; each successful mutation produces the new state and saves
/// it before returning, while a rejected submission leaves the state
/// untouched and skips the save.
pub struct Tracker<S: StorageAdapter> {
    state: AppState,
    catalog: DiseaseCatalog,
    store: S,
}

impl<S: StorageAdapter> Tracker<S> {
    /// Load a session from the given store, with the built-in catalog.
    pub fn new(store: S) -> Self {
        Self::with_catalog(store, DiseaseCatalog::default())
    }

    /// Load a session with a caller-supplied disease catalog.
    pub fn with_catalog(store: S, catalog: DiseaseCatalog) -> Self {
        let state = store.load();
        Self {
            state,
            catalog,
            store,
        }
    }

    // =========================================================================
    // Country Operations
    // =========================================================================

    /// Choose a country context. Clears any prior confirmation.
    pub fn set_country(&mut self, country: Country) -> Result<(), TrackerError> {
        self.state.country = Some(country);
        self.state.is_country_confirmed = false;
        self.persist()
    }

    /// Confirm the current country choice.
    pub fn confirm_country(&mut self) -> Result<(), TrackerError> {
        self.state.is_country_confirmed = true;
        self.persist()
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Create a record, or edit the latest completed dose of an existing one.
    pub fn upsert_record(&mut self, input: &RecordInput) -> Result<(), TrackerError> {
        let next = reconcile::upsert_record(&self.state.records, input, &calendar::today())?;
        self.state.records = next;
        self.persist()
    }

    /// Log a completed dose against an existing record, retiring the
    /// planned dose it fulfills.
    pub fn submit_completed_dose(&mut self, input: &DoseInput) -> Result<(), TrackerError> {
        let next = reconcile::submit_completed_dose(&self.state.records, input)?;
        self.state.records = next;
        self.persist()
    }

    /// Remove a record. Unknown disease ids are a no-op (still saved).
    pub fn remove_record(&mut self, disease_id: &str) -> Result<(), TrackerError> {
        self.state.records = reconcile::remove_record(&self.state.records, disease_id);
        self.persist()
    }

    /// Resolve an edit target without mutating anything.
    pub fn start_edit(&self, disease_id: &str) -> Option<String> {
        reconcile::start_edit(&self.state.records, disease_id)
    }

    // =========================================================================
    // View Operations
    // =========================================================================

    /// Catalog diseases not yet recorded, relevant to the chosen country.
    pub fn available_diseases(&self) -> Vec<&Disease> {
        view::available_diseases(&self.catalog, &self.state.records, self.state.country)
    }

    /// Category counts over the available diseases.
    pub fn category_counts(&self) -> CategoryCounts {
        let available = self.available_diseases();
        view::category_counts(&available, self.state.country)
    }

    /// All records with their next-due annotation, soonest first.
    pub fn records_by_next_due(&self) -> Vec<RecordView> {
        view::sorted_records_by_next_due(&self.state.records, &calendar::today())
    }

    /// Records due within the next calendar year.
    pub fn records_due_within_next_year(&self) -> Vec<RecordView> {
        let views = self.records_by_next_due();
        view::records_due_within_next_year(&views, &calendar::today())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current domain state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The disease catalog in use.
    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    fn persist(&self) -> Result<(), TrackerError> {
        self.store.save(&self.state)?;
        Ok(())
    }
}
