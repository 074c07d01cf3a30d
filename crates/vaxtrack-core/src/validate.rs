//! Submission validation.
//!
//! Checks run in a fixed order and short-circuit: the first failing rule's
//! code is the one callers see, and tests pin that precedence. Validation
//! failures are values, never panics, and no state is touched before a
//! submission passes.

use std::collections::HashSet;

use thiserror::Error;

use crate::calendar;
use crate::models::{DoseKind, RepeatUnit};

/// Stable validation error codes surfaced to callers.
///
/// `Display` renders the wire code; the set and spellings are a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("disease_required")]
    DiseaseRequired,
    #[error("completed_required")]
    CompletedRequired,
    #[error("completed_in_future")]
    CompletedInFuture,
    #[error("future_dates_invalid")]
    FutureDatesInvalid,
    #[error("future_date_before_completed")]
    FutureDateBeforeCompleted,
    #[error("future_dates_duplicate")]
    FutureDatesDuplicate,
    #[error("schedule_conflict")]
    ScheduleConflict,
    #[error("repeat_interval_invalid")]
    RepeatIntervalInvalid,
}

impl ValidationError {
    /// The wire code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DiseaseRequired => "disease_required",
            Self::CompletedRequired => "completed_required",
            Self::CompletedInFuture => "completed_in_future",
            Self::FutureDatesInvalid => "future_dates_invalid",
            Self::FutureDateBeforeCompleted => "future_date_before_completed",
            Self::FutureDatesDuplicate => "future_dates_duplicate",
            Self::ScheduleConflict => "schedule_conflict",
            Self::RepeatIntervalInvalid => "repeat_interval_invalid",
        }
    }
}

/// A proposed new or edited record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInput {
    pub disease_id: String,
    /// ISO date of the (first or latest) completed dose.
    pub completed_at: String,
    pub kind: DoseKind,
    pub trade_name: Option<String>,
    pub batch_number: Option<String>,
    pub future_doses: Vec<PlannedDoseInput>,
    pub repeat: Option<RepeatInput>,
}

/// A planned dose inside a record submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDoseInput {
    /// Existing planned-dose id; `None` mints a fresh one on upsert.
    pub id: Option<String>,
    pub due_at: String,
    pub kind: DoseKind,
}

/// A repeat rule inside a record submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatInput {
    /// Must be a positive whole number of units.
    pub interval: i64,
    pub kind: DoseKind,
    pub unit: RepeatUnit,
}

/// A proposed completed-dose submission against an existing record.
#[derive(Debug, Clone, PartialEq)]
pub struct DoseInput {
    pub disease_id: String,
    pub completed_at: String,
    pub kind: DoseKind,
    pub trade_name: Option<String>,
    pub batch_number: Option<String>,
    /// Planned dose this completion fulfills, if any.
    pub planned_dose_id: Option<String>,
}

/// Validate a record submission against `today`.
pub fn validate_record_submission(
    input: &RecordInput,
    today: &str,
) -> Result<(), ValidationError> {
    if input.disease_id.trim().is_empty() {
        return Err(ValidationError::DiseaseRequired);
    }
    if !calendar::is_iso_date(&input.completed_at) {
        return Err(ValidationError::CompletedRequired);
    }
    if input.completed_at.as_str() > today {
        return Err(ValidationError::CompletedInFuture);
    }
    if input
        .future_doses
        .iter()
        .any(|d| !calendar::is_iso_date(&d.due_at))
    {
        return Err(ValidationError::FutureDatesInvalid);
    }
    if input
        .future_doses
        .iter()
        .any(|d| d.due_at < input.completed_at)
    {
        return Err(ValidationError::FutureDateBeforeCompleted);
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for dose in &input.future_doses {
        if !seen.insert(dose.due_at.as_str()) {
            return Err(ValidationError::FutureDatesDuplicate);
        }
    }
    if !input.future_doses.is_empty() && input.repeat.is_some() {
        // A record is on a manual plan or a repeat plan, never both.
        return Err(ValidationError::ScheduleConflict);
    }
    if let Some(repeat) = &input.repeat {
        if repeat.interval <= 0 {
            return Err(ValidationError::RepeatIntervalInvalid);
        }
    }
    Ok(())
}

/// Validate the shape of a completed-dose submission.
///
/// Existence of the target record is checked by the reconciliation layer,
/// not here.
pub fn validate_completed_dose_submission(input: &DoseInput) -> Result<(), ValidationError> {
    if !calendar::is_iso_date(&input.completed_at) {
        return Err(ValidationError::CompletedRequired);
    }
    Ok(())
}
