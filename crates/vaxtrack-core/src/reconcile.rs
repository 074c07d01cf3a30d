//! Record reconciliation: the only code that creates or mutates records.
//!
//! Every function takes the current collection and returns a fresh one. A
//! rejected submission returns the error code and the input collection is
//! observably unchanged; there are no partial effects.

use crate::models::{CompletedDose, ImmunizationSeries, PlannedDose, RepeatRule};
use crate::validate::{
    self, DoseInput, PlannedDoseInput, RecordInput, RepeatInput, ValidationError,
};

/// Insert or edit a record, keyed by disease id.
///
/// Without an existing record this creates one from the input's first
/// completed dose. With one, this is "edit latest completed dose"
/// semantics: only the chronologically latest history entry takes the
/// submitted dose fields, while the schedule fields (planned doses and
/// repeat rule) are replaced wholesale.
pub fn upsert_record(
    records: &[ImmunizationSeries],
    input: &RecordInput,
    today: &str,
) -> Result<Vec<ImmunizationSeries>, ValidationError> {
    validate::validate_record_submission(input, today)?;

    let future = planned_from_inputs(&input.future_doses);
    let repeat = input.repeat.as_ref().map(rule_from_input);

    let mut next = records.to_vec();
    match next.iter_mut().find(|r| r.disease_id == input.disease_id) {
        None => {
            let first = CompletedDose::new(
                input.completed_at.clone(),
                input.kind,
                input.trade_name.clone(),
                input.batch_number.clone(),
            );
            next.push(ImmunizationSeries::new(
                input.disease_id.clone(),
                first,
                future,
                repeat,
            ));
        }
        Some(record) => {
            if let Some(i) = record.latest_completed_index() {
                let dose = &mut record.completed_doses[i];
                dose.completed_at = input.completed_at.clone();
                dose.kind = input.kind;
                dose.trade_name = input.trade_name.clone();
                dose.batch_number = input.batch_number.clone();
            }
            record.sort_completed();
            record.future_due_doses = future;
            record.repeat_every = repeat;
            record.touch();
        }
    }
    Ok(next)
}

/// Append a completed dose to an existing record, retiring the planned dose
/// it fulfills.
///
/// Shape is validated first; the target record must already exist, which is
/// an existence check against state and fails with `disease_required`.
/// Untargeted records pass through unchanged.
pub fn submit_completed_dose(
    records: &[ImmunizationSeries],
    input: &DoseInput,
) -> Result<Vec<ImmunizationSeries>, ValidationError> {
    validate::validate_completed_dose_submission(input)?;

    let mut next = records.to_vec();
    let record = next
        .iter_mut()
        .find(|r| r.disease_id == input.disease_id)
        .ok_or(ValidationError::DiseaseRequired)?;

    record.completed_doses.push(CompletedDose::new(
        input.completed_at.clone(),
        input.kind,
        input.trade_name.clone(),
        input.batch_number.clone(),
    ));
    record.sort_completed();
    if let Some(planned_id) = &input.planned_dose_id {
        record.future_due_doses.retain(|d| &d.id != planned_id);
    }
    record.touch();
    Ok(next)
}

/// Remove a record. Removing an untracked disease id is a no-op.
pub fn remove_record(records: &[ImmunizationSeries], disease_id: &str) -> Vec<ImmunizationSeries> {
    records
        .iter()
        .filter(|r| r.disease_id != disease_id)
        .cloned()
        .collect()
}

/// Resolve an edit target: the disease id iff a record for it exists.
pub fn start_edit(records: &[ImmunizationSeries], disease_id: &str) -> Option<String> {
    records
        .iter()
        .find(|r| r.disease_id == disease_id)
        .map(|r| r.disease_id.clone())
}

fn planned_from_inputs(inputs: &[PlannedDoseInput]) -> Vec<PlannedDose> {
    inputs
        .iter()
        .map(|input| match &input.id {
            Some(id) => PlannedDose {
                id: id.clone(),
                due_at: input.due_at.clone(),
                kind: input.kind,
            },
            None => PlannedDose::new(input.due_at.clone(), input.kind),
        })
        .collect()
}

fn rule_from_input(input: &RepeatInput) -> RepeatRule {
    // Interval positivity was validated; the cast cannot truncate a valid rule.
    RepeatRule {
        interval: u32::try_from(input.interval).unwrap_or(0),
        kind: input.kind,
        unit: input.unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DoseKind;

    const TODAY: &str = "2025-01-15";

    fn record_input(disease_id: &str, completed_at: &str) -> RecordInput {
        RecordInput {
            disease_id: disease_id.into(),
            completed_at: completed_at.into(),
            kind: DoseKind::NextDose,
            trade_name: None,
            batch_number: None,
            future_doses: vec![],
            repeat: None,
        }
    }

    fn dose_input(disease_id: &str, completed_at: &str) -> DoseInput {
        DoseInput {
            disease_id: disease_id.into(),
            completed_at: completed_at.into(),
            kind: DoseKind::Revaccination,
            trade_name: None,
            batch_number: None,
            planned_dose_id: None,
        }
    }

    #[test]
    fn test_upsert_creates_record_with_single_dose() {
        let records = upsert_record(&[], &record_input("measles", "2024-01-10"), TODAY).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].disease_id, "measles");
        assert_eq!(records[0].completed_doses.len(), 1);
        assert_eq!(records[0].completed_doses[0].completed_at, "2024-01-10");
    }

    #[test]
    fn test_upsert_existing_edits_latest_dose_only() {
        let records = upsert_record(&[], &record_input("measles", "2024-01-10"), TODAY).unwrap();
        let records =
            submit_completed_dose(&records, &dose_input("measles", "2024-06-01")).unwrap();
        assert_eq!(records[0].completed_doses.len(), 2);

        let mut edit = record_input("measles", "2024-07-15");
        edit.trade_name = Some("Priorix".into());
        let records = upsert_record(&records, &edit, TODAY).unwrap();

        // History length unchanged; only the latest entry took the new values.
        assert_eq!(records[0].completed_doses.len(), 2);
        assert_eq!(records[0].completed_doses[0].completed_at, "2024-01-10");
        assert_eq!(records[0].completed_doses[0].trade_name, None);
        assert_eq!(records[0].completed_doses[1].completed_at, "2024-07-15");
        assert_eq!(records[0].completed_doses[1].trade_name, Some("Priorix".into()));
    }

    #[test]
    fn test_upsert_is_idempotent_on_history_length() {
        let input = record_input("measles", "2024-01-10");
        let records = upsert_record(&[], &input, TODAY).unwrap();
        let records = upsert_record(&records, &input, TODAY).unwrap();
        let records = upsert_record(&records, &input, TODAY).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].completed_doses.len(), 1);
        assert_eq!(records[0].completed_doses[0].completed_at, "2024-01-10");
    }

    #[test]
    fn test_upsert_edit_resorts_history() {
        let records = upsert_record(&[], &record_input("measles", "2024-06-01"), TODAY).unwrap();
        let records =
            submit_completed_dose(&records, &dose_input("measles", "2024-08-01")).unwrap();
        // Rewind the latest completion behind the older one.
        let records = upsert_record(&records, &record_input("measles", "2024-02-01"), TODAY).unwrap();
        let dates: Vec<&str> = records[0]
            .completed_doses
            .iter()
            .map(|d| d.completed_at.as_str())
            .collect();
        assert_eq!(dates, vec!["2024-02-01", "2024-06-01"]);
    }

    #[test]
    fn test_upsert_replaces_schedule_wholesale() {
        let mut input = record_input("tetanus", "2024-01-10");
        input.future_doses = vec![PlannedDoseInput {
            id: None,
            due_at: "2025-06-01".into(),
            kind: DoseKind::NextDose,
        }];
        let records = upsert_record(&[], &input, TODAY).unwrap();
        assert_eq!(records[0].future_due_doses.len(), 1);
        assert!(records[0].repeat_every.is_none());

        let mut edit = record_input("tetanus", "2024-01-10");
        edit.repeat = Some(RepeatInput {
            interval: 10,
            kind: DoseKind::Revaccination,
            unit: crate::models::RepeatUnit::Years,
        });
        let records = upsert_record(&records, &edit, TODAY).unwrap();
        assert!(records[0].future_due_doses.is_empty());
        assert_eq!(records[0].repeat_every.as_ref().unwrap().interval, 10);
    }

    #[test]
    fn test_upsert_validation_failure_leaves_records_unchanged() {
        let records = upsert_record(&[], &record_input("measles", "2024-01-10"), TODAY).unwrap();
        let err = upsert_record(&records, &record_input("", "2024-01-10"), TODAY).unwrap_err();
        assert_eq!(err, ValidationError::DiseaseRequired);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_upsert_keeps_supplied_planned_ids_and_mints_missing() {
        let mut input = record_input("tetanus", "2024-01-10");
        input.future_doses = vec![
            PlannedDoseInput {
                id: Some("keep-me".into()),
                due_at: "2025-06-01".into(),
                kind: DoseKind::NextDose,
            },
            PlannedDoseInput {
                id: None,
                due_at: "2026-06-01".into(),
                kind: DoseKind::NextDose,
            },
        ];
        let records = upsert_record(&[], &input, TODAY).unwrap();
        assert_eq!(records[0].future_due_doses[0].id, "keep-me");
        assert_eq!(records[0].future_due_doses[1].id.len(), 36);
    }

    #[test]
    fn test_submit_dose_requires_existing_record() {
        let err = submit_completed_dose(&[], &dose_input("measles", "2024-06-01")).unwrap_err();
        assert_eq!(err, ValidationError::DiseaseRequired);
    }

    #[test]
    fn test_submit_dose_shape_checked_before_existence() {
        let err = submit_completed_dose(&[], &dose_input("measles", "junk")).unwrap_err();
        assert_eq!(err, ValidationError::CompletedRequired);
    }

    #[test]
    fn test_submit_dose_retires_exactly_the_fulfilled_plan() {
        let mut input = record_input("tetanus", "2024-01-10");
        input.future_doses = vec![
            PlannedDoseInput {
                id: Some("plan-a".into()),
                due_at: "2025-06-01".into(),
                kind: DoseKind::NextDose,
            },
            PlannedDoseInput {
                id: Some("plan-b".into()),
                due_at: "2026-06-01".into(),
                kind: DoseKind::NextDose,
            },
        ];
        let records = upsert_record(&[], &input, TODAY).unwrap();

        let mut dose = dose_input("tetanus", "2025-06-03");
        dose.planned_dose_id = Some("plan-a".into());
        let records = submit_completed_dose(&records, &dose).unwrap();

        assert_eq!(records[0].completed_doses.len(), 2);
        assert_eq!(records[0].future_due_doses.len(), 1);
        assert_eq!(records[0].future_due_doses[0].id, "plan-b");
    }

    #[test]
    fn test_submit_dose_without_plan_id_keeps_plans() {
        let mut input = record_input("tetanus", "2024-01-10");
        input.future_doses = vec![PlannedDoseInput {
            id: Some("plan-a".into()),
            due_at: "2025-06-01".into(),
            kind: DoseKind::NextDose,
        }];
        let records = upsert_record(&[], &input, TODAY).unwrap();
        let records =
            submit_completed_dose(&records, &dose_input("tetanus", "2024-06-01")).unwrap();
        assert_eq!(records[0].future_due_doses.len(), 1);
    }

    #[test]
    fn test_submit_dose_leaves_other_records_untouched() {
        let records = upsert_record(&[], &record_input("measles", "2024-01-10"), TODAY).unwrap();
        let records =
            upsert_record(&records, &record_input("tetanus", "2023-05-01"), TODAY).unwrap();
        let before_measles = records
            .iter()
            .find(|r| r.disease_id == "measles")
            .unwrap()
            .clone();

        let after = submit_completed_dose(&records, &dose_input("tetanus", "2024-09-01")).unwrap();
        let after_measles = after.iter().find(|r| r.disease_id == "measles").unwrap();
        assert_eq!(*after_measles, before_measles);
    }

    #[test]
    fn test_remove_record_filters_and_tolerates_unknown() {
        let records = upsert_record(&[], &record_input("measles", "2024-01-10"), TODAY).unwrap();
        let records = remove_record(&records, "measles");
        assert!(records.is_empty());
        let records = remove_record(&records, "not-there");
        assert!(records.is_empty());
    }

    #[test]
    fn test_start_edit() {
        let records = upsert_record(&[], &record_input("measles", "2024-01-10"), TODAY).unwrap();
        assert_eq!(start_edit(&records, "measles"), Some("measles".into()));
        assert_eq!(start_edit(&records, "tetanus"), None);
    }
}
