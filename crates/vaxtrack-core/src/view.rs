//! Read-only projections for display.
//!
//! Nothing here mutates state; every function derives a fresh view from the
//! records and the catalog.

use std::cmp::Ordering;

use crate::calendar;
use crate::models::{Country, Disease, DiseaseCatalog, DiseaseCategory, ImmunizationSeries};
use crate::schedule::{self, NextDue};

/// A record annotated with its resolved next due entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub series: ImmunizationSeries,
    pub next_due: Option<NextDue>,
}

/// Counts of available diseases per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryCounts {
    pub recommended: usize,
    pub optional: usize,
}

/// Catalog diseases relevant to the country and not yet recorded.
///
/// An unset country behaves like [`Country::None`]: everything is relevant.
pub fn available_diseases<'a>(
    catalog: &'a DiseaseCatalog,
    records: &[ImmunizationSeries],
    country: Option<Country>,
) -> Vec<&'a Disease> {
    let country = country.unwrap_or(Country::None);
    catalog
        .entries()
        .iter()
        .filter(|d| d.is_relevant_for(country))
        .filter(|d| !records.iter().any(|r| r.disease_id == d.id))
        .collect()
}

/// Per-category counts over a disease selection; zero for NONE/unset.
pub fn category_counts(diseases: &[&Disease], country: Option<Country>) -> CategoryCounts {
    let Some(country) = country else {
        return CategoryCounts::default();
    };
    let mut counts = CategoryCounts::default();
    for disease in diseases {
        match disease.category_for(country) {
            Some(DiseaseCategory::Recommended) => counts.recommended += 1,
            Some(DiseaseCategory::Optional) => counts.optional += 1,
            None => {}
        }
    }
    counts
}

/// All records annotated with their next due entry, sorted ascending by due
/// date.
///
/// Records without any due date sort last; both ties and the no-date group
/// preserve input order (stable sort). Plain string comparison is correct
/// for fixed-width ISO dates.
pub fn sorted_records_by_next_due(
    records: &[ImmunizationSeries],
    reference: &str,
) -> Vec<RecordView> {
    let mut views: Vec<RecordView> = records
        .iter()
        .map(|series| RecordView {
            next_due: schedule::resolve_next_due(series, reference),
            series: series.clone(),
        })
        .collect();
    views.sort_by(|a, b| match (&a.next_due, &b.next_due) {
        (Some(x), Some(y)) => x.due_at.cmp(&y.due_at),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    views
}

/// Views whose due date falls within `[today, today + 1 calendar year]`,
/// both ends inclusive.
pub fn records_due_within_next_year(views: &[RecordView], today: &str) -> Vec<RecordView> {
    let Some(horizon) = calendar::add_months(today, 12) else {
        return Vec::new();
    };
    views
        .iter()
        .filter(|v| {
            v.next_due
                .as_ref()
                .is_some_and(|due| due.due_at.as_str() >= today && due.due_at <= horizon)
        })
        .cloned()
        .collect()
}
