//! Golden tests for next-due resolution.
//!
//! Each case pins a record shape, a reference date, and the exact expected
//! outcome.

use vaxtrack_core::models::{
    CompletedDose, DoseKind, ImmunizationSeries, PlannedDose, RepeatRule, RepeatUnit,
};
use vaxtrack_core::schedule::{resolve_next_due, DueSource};

/// One golden resolution case.
struct GoldenCase {
    id: &'static str,
    completed: &'static [&'static str],
    planned: &'static [&'static str],
    repeat: Option<(u32, RepeatUnit)>,
    reference: &'static str,
    expected_due: Option<&'static str>,
    expected_source: Option<DueSource>,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "manual-plan-ahead",
            completed: &["2024-01-10"],
            planned: &["2025-06-01"],
            repeat: None,
            reference: "2025-05-01",
            expected_due: Some("2025-06-01"),
            expected_source: Some(DueSource::Manual),
        },
        GoldenCase {
            id: "manual-earliest-pending-wins",
            completed: &["2024-01-10"],
            planned: &["2026-03-01", "2025-06-01", "2024-02-01"],
            repeat: None,
            reference: "2025-01-01",
            expected_due: Some("2025-06-01"),
            expected_source: Some(DueSource::Manual),
        },
        GoldenCase {
            id: "manual-due-today",
            completed: &["2024-01-10"],
            planned: &["2025-05-01"],
            repeat: None,
            reference: "2025-05-01",
            expected_due: Some("2025-05-01"),
            expected_source: Some(DueSource::Manual),
        },
        GoldenCase {
            id: "repeat-ten-years",
            completed: &["2020-01-10"],
            planned: &[],
            repeat: Some((10, RepeatUnit::Years)),
            reference: "2026-01-01",
            expected_due: Some("2030-01-10"),
            expected_source: Some(DueSource::Repeat),
        },
        GoldenCase {
            id: "repeat-uses-latest-completion",
            completed: &["2010-03-01", "2021-07-15", "2016-05-20"],
            planned: &[],
            repeat: Some((10, RepeatUnit::Years)),
            reference: "2026-01-01",
            expected_due: Some("2031-07-15"),
            expected_source: Some(DueSource::Repeat),
        },
        GoldenCase {
            id: "repeat-rolls-past-missed-occurrences",
            completed: &["2010-03-05"],
            planned: &[],
            repeat: Some((6, RepeatUnit::Months)),
            reference: "2024-01-01",
            expected_due: Some("2024-03-05"),
            expected_source: Some(DueSource::Repeat),
        },
        GoldenCase {
            id: "repeat-clamps-month-end",
            completed: &["2023-08-31"],
            planned: &[],
            repeat: Some((6, RepeatUnit::Months)),
            reference: "2024-01-01",
            expected_due: Some("2024-02-29"),
            expected_source: Some(DueSource::Repeat),
        },
        GoldenCase {
            id: "manual-beats-repeat",
            completed: &["2020-01-10"],
            planned: &["2026-07-01"],
            repeat: Some((10, RepeatUnit::Years)),
            reference: "2026-01-01",
            expected_due: Some("2026-07-01"),
            expected_source: Some(DueSource::Manual),
        },
        GoldenCase {
            id: "expired-plan-falls-back-to-repeat",
            completed: &["2020-01-10"],
            planned: &["2021-01-01"],
            repeat: Some((10, RepeatUnit::Years)),
            reference: "2026-01-01",
            expected_due: Some("2030-01-10"),
            expected_source: Some(DueSource::Repeat),
        },
        GoldenCase {
            id: "no-schedule",
            completed: &["2024-01-10"],
            planned: &[],
            repeat: None,
            reference: "2025-01-01",
            expected_due: None,
            expected_source: None,
        },
        GoldenCase {
            id: "expired-plan-without-repeat",
            completed: &["2024-01-10"],
            planned: &["2024-06-01"],
            repeat: None,
            reference: "2025-01-01",
            expected_due: None,
            expected_source: None,
        },
        GoldenCase {
            id: "rollover-cap-bails-out",
            completed: &["2020-01-10"],
            planned: &[],
            repeat: Some((1, RepeatUnit::Months)),
            reference: "2090-01-01",
            expected_due: None,
            expected_source: None,
        },
    ]
}

fn build_record(case: &GoldenCase) -> ImmunizationSeries {
    let mut completed = case
        .completed
        .iter()
        .map(|d| CompletedDose::new((*d).to_string(), DoseKind::NextDose, None, None));
    let first = completed.next().expect("golden cases have history");
    let mut record = ImmunizationSeries::new("golden".into(), first, vec![], None);
    record.completed_doses.extend(completed);

    record.future_due_doses = case
        .planned
        .iter()
        .map(|d| PlannedDose::new((*d).to_string(), DoseKind::NextDose))
        .collect();
    record.repeat_every = case.repeat.map(|(interval, unit)| RepeatRule {
        interval,
        kind: DoseKind::Revaccination,
        unit,
    });
    record
}

#[test]
fn golden_next_due_cases() {
    for case in get_golden_cases() {
        let record = build_record(&case);
        let resolved = resolve_next_due(&record, case.reference);

        match (case.expected_due, &resolved) {
            (None, None) => {}
            (Some(expected), Some(actual)) => {
                assert_eq!(actual.due_at, expected, "case {}", case.id);
                assert_eq!(
                    Some(actual.source),
                    case.expected_source,
                    "case {}",
                    case.id
                );
                match actual.source {
                    DueSource::Manual => {
                        assert!(actual.planned_dose_id.is_some(), "case {}", case.id)
                    }
                    DueSource::Repeat => {
                        assert_eq!(actual.planned_dose_id, None, "case {}", case.id)
                    }
                }
            }
            (expected, actual) => {
                panic!("case {}: expected {:?}, got {:?}", case.id, expected, actual)
            }
        }
    }
}
