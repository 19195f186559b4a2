// src/extract.rs

use crate::headers::{Field, HeaderMap};
use crate::text::clean_text;

/// Victim-name markers for rows that are not individual victim records:
/// list headers, aggregate notices and placeholder rows that the source
/// keeps inline with real victims. Deny-list by deliberate design; extend
/// it with new markers as they show up, do not generalize it.
const NON_PERSON_NAME_MARKERS: &[&str] = &[
    "ברשימה",
    "פלסטינים",
    "תושבי השטחים",
    "נרצח בחו",
    "נמצאה תלויה",
];

/// First non-empty cleaned value among the columns mapped to `field`,
/// in column order. Empty string when the field is absent from the file or
/// every mapped cell is blank.
pub fn first_present_value(row: &[String], header_map: &HeaderMap, field: Field) -> String {
    let Some(indices) = header_map.get(&field) else {
        return String::new();
    };
    for &idx in indices {
        let value = clean_text(row.get(idx).map(String::as_str).unwrap_or(""));
        if !value.is_empty() {
            return value;
        }
    }
    String::new()
}

/// True when the victim-name cell marks a non-person row.
pub fn is_non_person_record(victim_name: &str) -> bool {
    let name = clean_text(victim_name);
    NON_PERSON_NAME_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
}
