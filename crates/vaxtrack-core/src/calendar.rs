//! Calendar date utilities.
//!
//! Dates travel through the crate as ISO `YYYY-MM-DD` strings, which sort
//! lexicographically in calendar order. These helpers are the only place
//! that parses them: malformed input yields `None` (or the raw input, for
//! display formatting), never a panic.

use chrono::{Local, Months, NaiveDate};

/// Check that a value is a real calendar date in strict `YYYY-MM-DD` form.
///
/// Rejects both shape violations (`2024-1-3`) and non-existent calendar
/// dates (`2024-02-30`).
pub fn is_iso_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Parse a strict `YYYY-MM-DD` string to a date.
///
/// Returns `None` on anything malformed; callers treat `None` as "no date".
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Add (or subtract) whole months to an ISO date.
///
/// The day of month is clamped to the target month's length:
/// `2023-01-31` + 1 month is `2023-02-28`, `2024-01-31` + 1 month is
/// `2024-02-29`. Returns `None` for invalid input or an out-of-range result.
pub fn add_months(value: &str, months: i32) -> Option<String> {
    let date = parse_date(value)?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))?
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))?
    };
    Some(format_iso(shifted))
}

/// Today's date on the caller's local calendar, as an ISO string.
///
/// The local day boundary is intentional: users reason about "today" in
/// their own timezone, not UTC.
pub fn today() -> String {
    format_iso(Local::now().date_naive())
}

/// Format an ISO date for display.
///
/// `ru` and `de` locale tags get `dd.mm.yyyy`; anything else gets
/// `Mon D, YYYY`. Unparseable input is returned unchanged.
pub fn format_for_display(value: &str, locale: &str) -> String {
    match parse_date(value) {
        Some(date) => match locale {
            "ru" | "de" => date.format("%d.%m.%Y").to_string(),
            _ => date.format("%b %-d, %Y").to_string(),
        },
        None => value.to_string(),
    }
}

fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
