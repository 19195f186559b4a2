// src/headers.rs

use crate::text::header_key;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical field identifiers for the target schema. Every known source
/// header variant maps to exactly one of these; headers outside the table are
/// ignored for the file they appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SerialNumber,
    CaseNumber,
    VictimNameHe,
    VictimNameAr,
    Age,
    Gender,
    Citizen,
    Religion,
    ResidenceLocality,
    ResidenceLocalityType,
    ResidencePopulationType,
    GeographicArea,
    GeographicAreaAlt,
    DistrictState,
    DistrictPolice,
    EventDate,
    DeathDate,
    Month,
    IncidentLocation,
    ExactLocation,
    Solved,
    PoliceStatus,
    WeaponMain,
    WeaponDetail,
    Intent,
    Description,
    Background,
    Notes,
    SourceUrl1,
    SourceUrl2,
}

/// The header cell that anchors the real header row. Source files carry
/// preamble/title rows above it, so the row is found by scanning for this
/// label rather than assumed to be first.
pub const HEADER_ANCHOR: &str = "שם הקורבן";

/// Known header-text variants across all source years, keyed by the
/// normalized form produced by [`header_key`]. Covers wording drift and typos
/// release to release; extend by adding entries, never by fuzzy matching.
static HEADER_FIELDS: Lazy<HashMap<&'static str, Field>> = Lazy::new(|| {
    use Field::*;

    let entries: &[(&str, Field)] = &[
        ("מס ד", SerialNumber),
        ("מסד", SerialNumber),
        ("מספר מקרה", CaseNumber),
        ("מקרה", CaseNumber),
        ("שם הקורבן", VictimNameHe),
        ("שם בערבית", VictimNameAr),
        ("גיל", Age),
        ("מין", Gender),
        ("מגדר", Gender),
        ("אזרח", Citizen),
        ("דת", Religion),
        ("ישוב המגורים", ResidenceLocality),
        ("ישוב מגורים", ResidenceLocality),
        ("יישוב מגורים", ResidenceLocality),
        ("יישוב", ResidenceLocality),
        ("ישוב", ResidenceLocality),
        ("סוג ישוב המגורים של הנרצח ת", ResidenceLocalityType),
        ("סוג יישוב המגורים של הנרצח ת", ResidenceLocalityType),
        ("ישוב לפי אוכלוסיית התושבים", ResidencePopulationType),
        ("יישוב לפי אוכלוסיית התושבים", ResidencePopulationType),
        ("איזור", GeographicArea),
        ("איזור גיאוגרפי", GeographicArea),
        ("אזור גיאוגרפי", GeographicArea),
        ("איזור לפי החלוקה של 2019", GeographicAreaAlt),
        ("מחוז", DistrictState),
        ("מחוז מדינה", DistrictState),
        ("מחוז משטרה", DistrictPolice),
        ("תאריך אירוע", EventDate),
        ("תאריך פטירה", DeathDate),
        ("חודש", Month),
        ("חודש 2019", Month),
        ("חודש 2020", Month),
        ("חודש 2021", Month),
        ("מקום האירוע", IncidentLocation),
        ("מיקום מדויק", ExactLocation),
        ("פוענח", Solved),
        ("פענוח", Solved),
        ("סטאטוס", PoliceStatus),
        ("כתב אישום עצורים או פעילות משטרתית", PoliceStatus),
        ("כלי רצח", WeaponMain),
        ("כלי רצח ירי", WeaponMain),
        ("כלי הרג ירי אחר", WeaponMain),
        ("כלי רצח אחר", WeaponDetail),
        ("מכוון לא מכוון", Intent),
        ("פירוט", Description),
        ("סיווג רקע לאירוע", Background),
        ("רקע", Background),
        ("הערות", Notes),
        ("קישור", SourceUrl1),
        ("קישור2", SourceUrl2),
        ("קישור 2", SourceUrl2),
    ];

    entries.iter().copied().collect()
});

/// Map one raw header cell to its canonical field, if the normalized key is
/// known. Unknown headers are dropped silently.
pub fn map_header_to_field(raw: &str) -> Option<Field> {
    let key = header_key(raw);
    if key.is_empty() {
        return None;
    }
    HEADER_FIELDS.get(key.as_str()).copied()
}

/// Column indices per canonical field, in column order. A field can appear
/// under several spellings in one file; all its columns are recorded so the
/// extractor can take the first non-empty value.
pub type HeaderMap = HashMap<Field, Vec<usize>>;

pub fn build_header_map(header_row: &[String]) -> HeaderMap {
    let mut map: HeaderMap = HashMap::new();
    for (idx, cell) in header_row.iter().enumerate() {
        if let Some(field) = map_header_to_field(cell) {
            map.entry(field).or_default().push(idx);
        }
    }
    map
}
