//! Whole-application domain state.

use super::catalog::Country;
use super::record::ImmunizationSeries;

/// The tracker's domain state: country context plus all records.
///
/// Treated as one atomic unit — every mutation produces a new state, and
/// that new state is what gets handed to the storage adapter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Chosen country context; `None` until the user has picked one.
    pub country: Option<Country>,
    /// Whether the user has confirmed the country choice.
    pub is_country_confirmed: bool,
    /// One series per disease id.
    pub records: Vec<ImmunizationSeries>,
}

impl AppState {
    /// Look up the series for a disease.
    pub fn find(&self, disease_id: &str) -> Option<&ImmunizationSeries> {
        self.records.iter().find(|r| r.disease_id == disease_id)
    }
}
