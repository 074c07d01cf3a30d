//! Immunization record models: dose history and schedules per disease.

use serde::{Deserialize, Serialize};

/// What a dose administration represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoseKind {
    /// The next dose in a primary series.
    #[serde(rename = "nextDose")]
    NextDose,
    /// A booster renewing existing immunity.
    #[serde(rename = "revaccination")]
    Revaccination,
}

/// Unit of a repeating-schedule interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatUnit {
    Months,
    Years,
}

impl RepeatUnit {
    /// Parse a stored unit tag. Unknown tags yield `None`; boundary callers
    /// treat that as an invalid repeat rule.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "months" => Some(Self::Months),
            "years" => Some(Self::Years),
            _ => None,
        }
    }
}

/// A historical fact: a dose was administered.
///
/// Immutable once created, with one exception: editing a record overwrites
/// the chronologically latest entry's fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDose {
    /// Opaque stable identifier.
    pub id: String,
    /// ISO calendar date the dose was administered.
    pub completed_at: String,
    pub kind: DoseKind,
    /// Vaccine trade name, if the user recorded it.
    pub trade_name: Option<String>,
    /// Batch/lot number, if the user recorded it.
    pub batch_number: Option<String>,
}

impl CompletedDose {
    /// Create a completed dose with a fresh id.
    pub fn new(
        completed_at: String,
        kind: DoseKind,
        trade_name: Option<String>,
        batch_number: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            completed_at,
            kind,
            trade_name,
            batch_number,
        }
    }
}

/// A user-planned future dose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedDose {
    pub id: String,
    /// ISO calendar date the dose is due.
    pub due_at: String,
    pub kind: DoseKind,
}

impl PlannedDose {
    /// Create a planned dose with a fresh id.
    pub fn new(due_at: String, kind: DoseKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            due_at,
            kind,
        }
    }
}

/// A recurring schedule: one dose every `interval` months or years,
/// projected from the latest factual completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    /// Positive number of units between doses.
    pub interval: u32,
    pub kind: DoseKind,
    pub unit: RepeatUnit,
}

/// The per-disease aggregate: completed-dose history plus schedule.
///
/// A series exists only alongside at least one completed dose; the
/// sanitizing load boundary discards anything else. `completed_doses` is
/// kept sorted ascending by `completed_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImmunizationSeries {
    /// Key into the static disease catalog; unique within a collection.
    pub disease_id: String,
    pub completed_doses: Vec<CompletedDose>,
    pub future_due_doses: Vec<PlannedDose>,
    pub repeat_every: Option<RepeatRule>,
    /// RFC 3339 timestamp of the last mutation.
    pub updated_at: String,
}

impl ImmunizationSeries {
    /// Create a series from its first completed dose.
    pub fn new(
        disease_id: String,
        first_dose: CompletedDose,
        future_due_doses: Vec<PlannedDose>,
        repeat_every: Option<RepeatRule>,
    ) -> Self {
        Self {
            disease_id,
            completed_doses: vec![first_dose],
            future_due_doses,
            repeat_every,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Index of the chronologically latest completed dose.
    ///
    /// Ties on `completed_at` keep the earliest array position: only a
    /// strictly later date displaces the current latest.
    pub fn latest_completed_index(&self) -> Option<usize> {
        let mut latest: Option<usize> = None;
        for (i, dose) in self.completed_doses.iter().enumerate() {
            match latest {
                Some(j) if dose.completed_at <= self.completed_doses[j].completed_at => {}
                _ => latest = Some(i),
            }
        }
        latest
    }

    /// The chronologically latest completed dose.
    pub fn latest_completed(&self) -> Option<&CompletedDose> {
        self.latest_completed_index().map(|i| &self.completed_doses[i])
    }

    /// Re-sort history ascending by completion date (stable).
    pub fn sort_completed(&mut self) {
        self.completed_doses
            .sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
