//! Domain types for the vaccination tracker.

mod catalog;
mod record;
mod state;

pub use catalog::{Country, Disease, DiseaseCatalog, DiseaseCategory};
pub use record::{CompletedDose, DoseKind, ImmunizationSeries, PlannedDose, RepeatRule, RepeatUnit};
pub use state::AppState;
