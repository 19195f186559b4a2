// src/dates.rs

use crate::text::{clean_text, parse_int};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,4}").expect("regex should parse"));

/// A partially specified date pulled out of free text. `has_explicit_year`
/// distinguishes a year the source actually wrote from one substituted in
/// from the dataset year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub raw: String,
    pub date: NaiveDate,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub has_explicit_year: bool,
}

impl DateParts {
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Parse a free-text date into components. Accepts any separator; the digit
/// runs are what matter. Day and month are required, an optional third run
/// is the year (two-digit years windowed to 2000+). An explicit year outside
/// `[1990, fallback_year + 1]` is treated as a transcription typo and the
/// fallback is substituted. Calendar-invalid combinations yield `None`.
pub fn parse_date_components(raw: &str, fallback_year: i32) -> Option<DateParts> {
    let text = clean_text(raw);
    if text.is_empty() {
        return None;
    }

    let parts: Vec<u32> = DATE_DIGIT_RUN
        .find_iter(&text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if parts.len() < 2 {
        return None;
    }

    let day = parts[0];
    let month = parts[1];
    let mut explicit_year = parts.get(2).copied();
    let mut year = match explicit_year {
        Some(y) if y < 100 => 2000 + y as i32,
        Some(y) => y as i32,
        None => fallback_year,
    };
    if explicit_year.is_some() && !(1990..=fallback_year + 1).contains(&year) {
        year = fallback_year;
        explicit_year = None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(DateParts {
        raw: text,
        date,
        day,
        month,
        year,
        has_explicit_year: explicit_year.is_some(),
    })
}

/// Parse the event and death dates of one record against the same fallback
/// year, then reconcile the pair.
///
/// Year-boundary heuristic: when neither date carries an explicit year and
/// the event month is greater than the death month, the incident crossed a
/// New Year's boundary the source did not spell out, so the event is moved
/// to the previous calendar year. This corrects one observed quirk of the
/// source data and nothing more general than that.
pub fn normalize_date_pair(
    event_raw: &str,
    death_raw: &str,
    dataset_year: i32,
) -> (Option<DateParts>, Option<DateParts>) {
    let event = parse_date_components(event_raw, dataset_year);
    let death = parse_date_components(death_raw, dataset_year);

    if let (Some(e), Some(d)) = (&event, &death) {
        if !e.has_explicit_year && !d.has_explicit_year && e.month > d.month {
            if let Some(shifted) = NaiveDate::from_ymd_opt(dataset_year - 1, e.month, e.day) {
                let mut e = e.clone();
                e.year = dataset_year - 1;
                e.date = shifted;
                return (Some(e), death);
            }
        }
    }

    (event, death)
}

/// Month for the record: an explicit month field that parses to 1..=12 wins,
/// else the event date's month, else the death date's month.
pub fn infer_month(
    month_raw: &str,
    event: Option<&DateParts>,
    death: Option<&DateParts>,
) -> Option<u32> {
    parse_int(month_raw)
        .or_else(|| event.map(|e| e.month))
        .or_else(|| death.map(|d| d.month))
        .filter(|m| (1..=12).contains(m))
}
