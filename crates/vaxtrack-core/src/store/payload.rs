//! Versioned snapshot payload and the sanitizing parse boundary.
//!
//! Persisted data is untrusted. Reading goes through a field-by-field
//! sanitization pass: a malformed dose costs that dose, a record without a
//! single valid completed dose costs that record, and anything wrong at the
//! top level (including a version mismatch) degrades to the empty default
//! state. Nothing in here returns an error to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar;
use crate::models::{
    AppState, CompletedDose, Country, ImmunizationSeries, PlannedDose, RepeatRule,
};

/// Snapshot format version. A payload with any other version is treated as
/// absent; there is no migration.
pub const STORAGE_VERSION: u32 = 2;

/// The exact persisted shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub version: u32,
    pub country: Option<Country>,
    pub is_country_confirmed: bool,
    pub records: Vec<StorageRecord>,
}

/// One record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageRecord {
    pub disease_id: String,
    pub updated_at: String,
    pub completed_doses: Vec<CompletedDose>,
    pub future_due_doses: Vec<PlannedDose>,
    pub repeat_every: Option<RepeatRule>,
}

/// Build the payload for the current state.
pub fn to_payload(state: &AppState) -> Payload {
    Payload {
        version: STORAGE_VERSION,
        country: state.country,
        is_country_confirmed: state.is_country_confirmed,
        records: state
            .records
            .iter()
            .map(|r| StorageRecord {
                disease_id: r.disease_id.clone(),
                updated_at: r.updated_at.clone(),
                completed_doses: r.completed_doses.clone(),
                future_due_doses: r.future_due_doses.clone(),
                repeat_every: r.repeat_every.clone(),
            })
            .collect(),
    }
}

/// Parse and sanitize raw snapshot text. Never fails.
pub fn from_json(raw: &str) -> AppState {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => sanitize(&value),
        Err(_) => AppState::default(),
    }
}

fn sanitize(value: &Value) -> AppState {
    let Some(obj) = value.as_object() else {
        return AppState::default();
    };
    if obj.get("version").and_then(Value::as_u64) != Some(u64::from(STORAGE_VERSION)) {
        return AppState::default();
    }

    let country = obj
        .get("country")
        .and_then(Value::as_str)
        .and_then(Country::parse);
    let is_country_confirmed = obj
        .get("isCountryConfirmed")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut records: Vec<ImmunizationSeries> = Vec::new();
    if let Some(items) = obj.get("records").and_then(Value::as_array) {
        for item in items {
            if let Some(record) = sanitize_record(item) {
                records.push(record);
            }
        }
    }
    dedupe_by_disease(&mut records);

    AppState {
        country,
        is_country_confirmed,
        records,
    }
}

fn sanitize_record(value: &Value) -> Option<ImmunizationSeries> {
    let obj = value.as_object()?;

    let disease_id = obj.get("diseaseId")?.as_str()?.trim();
    if disease_id.is_empty() {
        return None;
    }
    let updated_at = obj
        .get("updatedAt")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut completed: Vec<CompletedDose> = decode_each(obj.get("completedDoses"))
        .into_iter()
        .filter(|d: &CompletedDose| !d.id.is_empty() && calendar::is_iso_date(&d.completed_at))
        .collect();
    if completed.is_empty() {
        // A record exists only alongside its dose history.
        return None;
    }
    completed.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));

    let future: Vec<PlannedDose> = decode_each(obj.get("futureDueDoses"))
        .into_iter()
        .filter(|d: &PlannedDose| !d.id.is_empty() && calendar::is_iso_date(&d.due_at))
        .collect();

    let repeat = obj
        .get("repeatEvery")
        .and_then(|v| serde_json::from_value::<RepeatRule>(v.clone()).ok())
        .filter(|r| r.interval >= 1);

    Some(ImmunizationSeries {
        disease_id: disease_id.to_string(),
        completed_doses: completed,
        future_due_doses: future,
        repeat_every: repeat,
        updated_at,
    })
}

/// Decode array elements one by one so a single bad element drops only
/// itself.
fn decode_each<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Duplicate disease ids keep the most recently updated entry.
fn dedupe_by_disease(records: &mut Vec<ImmunizationSeries>) {
    let mut out: Vec<ImmunizationSeries> = Vec::with_capacity(records.len());
    for record in records.drain(..) {
        match out.iter_mut().find(|r| r.disease_id == record.disease_id) {
            Some(existing) => {
                if record.updated_at > existing.updated_at {
                    *existing = record;
                }
            }
            None => out.push(record),
        }
    }
    *records = out;
}
