//! Next-due schedule resolution.
//!
//! A record's "next due" is derived fresh on every read from its current
//! history and schedule; it is never stored. Manual plans carry explicit
//! user intent for a specific occurrence and always win over the
//! repeat-rule projection, which is recomputed from the latest factual
//! completion so that correcting a late completion reschedules the next
//! occurrence instead of drifting.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::models::{DoseKind, ImmunizationSeries, PlannedDose, RepeatUnit};

/// Hard bound on repeat-rule rollover steps. A corrupt or non-advancing
/// interval must terminate, not loop.
const ROLLOVER_CAP: u32 = 600;

/// Where a next-due entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueSource {
    Manual,
    Repeat,
}

/// The single authoritative next due date for a record.
#[derive(Debug, Clone, PartialEq)]
pub struct NextDue {
    /// ISO due date.
    pub due_at: String,
    pub kind: DoseKind,
    /// Id of the manual planned dose this came from; `None` for repeat rules.
    pub planned_dose_id: Option<String>,
    pub source: DueSource,
}

/// Resolve the next due entry for a record against a reference date.
///
/// Returns `None` when the record has no usable schedule: no pending manual
/// plan, and either no repeat rule or no valid completion to project from.
pub fn resolve_next_due(record: &ImmunizationSeries, reference: &str) -> Option<NextDue> {
    if let Some(dose) = next_planned(&record.future_due_doses, reference) {
        return Some(NextDue {
            due_at: dose.due_at.clone(),
            kind: dose.kind,
            planned_dose_id: Some(dose.id.clone()),
            source: DueSource::Manual,
        });
    }

    let rule = record.repeat_every.as_ref()?;
    if rule.interval == 0 {
        // Rejected at validation time; second line of defense here.
        return None;
    }
    let step_months = i32::try_from(match rule.unit {
        RepeatUnit::Months => i64::from(rule.interval),
        RepeatUnit::Years => i64::from(rule.interval) * 12,
    })
    .ok()?;

    let last_completed = record
        .completed_doses
        .iter()
        .map(|d| d.completed_at.as_str())
        .filter(|d| calendar::is_iso_date(d))
        .max()?;

    let mut current = last_completed.to_string();
    for _ in 0..ROLLOVER_CAP {
        let next = calendar::add_months(&current, step_months)?;
        if next <= current {
            return None;
        }
        if next.as_str() >= reference {
            return Some(NextDue {
                due_at: next,
                kind: rule.kind,
                planned_dose_id: None,
                source: DueSource::Repeat,
            });
        }
        current = next;
    }
    None
}

/// Resolve against today's local date.
pub fn resolve_next_due_today(record: &ImmunizationSeries) -> Option<NextDue> {
    resolve_next_due(record, &calendar::today())
}

/// The earliest still-pending manual plan.
///
/// Invalid due dates are dropped, the rest sorted ascending (stable, so
/// equal dates keep insertion order), duplicate ids keep their first
/// occurrence.
fn next_planned<'a>(doses: &'a [PlannedDose], reference: &str) -> Option<&'a PlannedDose> {
    let mut planned: Vec<&PlannedDose> = doses
        .iter()
        .filter(|d| calendar::is_iso_date(&d.due_at))
        .collect();
    planned.sort_by(|a, b| a.due_at.cmp(&b.due_at));

    let mut seen: HashSet<&str> = HashSet::new();
    planned.retain(|d| seen.insert(d.id.as_str()));

    planned
        .into_iter()
        .find(|d| d.due_at.as_str() >= reference)
}
