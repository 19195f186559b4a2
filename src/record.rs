// src/record.rs

use crate::normalize::{AgeGroup, CitizenStatus, FirearmInvolved, Gender, SolvedStatus, WeaponType};
use crate::text::safe_slug;
use serde::Serialize;

/// Column order of the normalized CSV. The JSON sink emits the same fields
/// in the same order; the dashboard depends on these names, so any change
/// here must update both sides together.
pub const OUTPUT_HEADERS: &[&str] = &[
    "record_uid",
    "source_file",
    "source_row_number",
    "dataset_year",
    "serial_number",
    "record_group",
    "included_in_main_tally",
    "case_number",
    "victim_name_he",
    "victim_name_ar",
    "age",
    "age_group",
    "gender_raw",
    "gender",
    "citizen_raw",
    "citizen_status",
    "religion",
    "residence_locality",
    "residence_locality_type",
    "residence_population_type",
    "geographic_area",
    "geographic_area_alt",
    "district_state",
    "district_police",
    "event_date_raw",
    "event_date_iso",
    "death_date_raw",
    "death_date_iso",
    "month_raw",
    "month_num",
    "incident_location",
    "exact_location",
    "solved_raw",
    "solved_status",
    "police_status",
    "weapon_raw",
    "weapon_type",
    "weapon_detail",
    "firearm_involved",
    "intent_raw",
    "background",
    "description",
    "notes",
    "source_url_1",
    "source_url_2",
];

/// One fully normalized victim record. Raw values ride along next to their
/// normalized counterparts for audit. Constructed once per qualifying source
/// row and immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalRecord {
    pub record_uid: String,
    pub source_file: String,
    pub source_row_number: usize,
    pub dataset_year: i32,
    pub serial_number: String,
    pub record_group: String,
    pub included_in_main_tally: bool,
    pub case_number: String,
    pub victim_name_he: String,
    pub victim_name_ar: String,
    pub age: Option<u32>,
    pub age_group: AgeGroup,
    pub gender_raw: String,
    pub gender: Gender,
    pub citizen_raw: String,
    pub citizen_status: CitizenStatus,
    pub religion: String,
    pub residence_locality: String,
    pub residence_locality_type: String,
    pub residence_population_type: String,
    pub geographic_area: String,
    pub geographic_area_alt: String,
    pub district_state: String,
    pub district_police: String,
    pub event_date_raw: String,
    pub event_date_iso: Option<String>,
    pub death_date_raw: String,
    pub death_date_iso: Option<String>,
    pub month_raw: String,
    pub month_num: Option<u32>,
    pub incident_location: String,
    pub exact_location: String,
    pub solved_raw: String,
    pub solved_status: SolvedStatus,
    pub police_status: String,
    pub weapon_raw: String,
    pub weapon_type: WeaponType,
    pub weapon_detail: String,
    pub firearm_involved: FirearmInvolved,
    pub intent_raw: String,
    pub background: String,
    pub description: String,
    pub notes: String,
    pub source_url_1: String,
    pub source_url_2: String,
}

impl CanonicalRecord {
    /// Year used to bucket this record into the yearly summary: death date,
    /// falling back to event date, falling back to the dataset year.
    pub fn resolution_year(&self) -> Option<i32> {
        let date = self
            .death_date_iso
            .as_deref()
            .or(self.event_date_iso.as_deref());
        match date {
            Some(iso) => iso.get(..4).and_then(|y| y.parse().ok()),
            None => Some(self.dataset_year),
        }
    }

    /// Cells for the normalized CSV, in [`OUTPUT_HEADERS`] order.
    pub fn csv_row(&self) -> Vec<String> {
        vec![
            self.record_uid.clone(),
            self.source_file.clone(),
            self.source_row_number.to_string(),
            self.dataset_year.to_string(),
            self.serial_number.clone(),
            self.record_group.clone(),
            self.included_in_main_tally.to_string(),
            self.case_number.clone(),
            self.victim_name_he.clone(),
            self.victim_name_ar.clone(),
            self.age.map(|a| a.to_string()).unwrap_or_default(),
            self.age_group.as_str().to_string(),
            self.gender_raw.clone(),
            self.gender.as_str().to_string(),
            self.citizen_raw.clone(),
            self.citizen_status.as_str().to_string(),
            self.religion.clone(),
            self.residence_locality.clone(),
            self.residence_locality_type.clone(),
            self.residence_population_type.clone(),
            self.geographic_area.clone(),
            self.geographic_area_alt.clone(),
            self.district_state.clone(),
            self.district_police.clone(),
            self.event_date_raw.clone(),
            self.event_date_iso.clone().unwrap_or_default(),
            self.death_date_raw.clone(),
            self.death_date_iso.clone().unwrap_or_default(),
            self.month_raw.clone(),
            self.month_num.map(|m| m.to_string()).unwrap_or_default(),
            self.incident_location.clone(),
            self.exact_location.clone(),
            self.solved_raw.clone(),
            self.solved_status.as_str().to_string(),
            self.police_status.clone(),
            self.weapon_raw.clone(),
            self.weapon_type.as_str().to_string(),
            self.weapon_detail.clone(),
            self.firearm_involved.as_str().to_string(),
            self.intent_raw.clone(),
            self.background.clone(),
            self.description.clone(),
            self.notes.clone(),
            self.source_url_1.clone(),
            self.source_url_2.clone(),
        ]
    }
}

/// Stable unique identifier for a record. The case number is preferred over
/// the serial number as the ID base; the physical row number suffix keeps
/// UIDs unique even when two rows in one file share a case number.
pub fn build_record_uid(
    dataset_year: i32,
    case_number: &str,
    serial_number: &str,
    source_row_number: usize,
) -> String {
    let id_base = if case_number.is_empty() {
        serial_number
    } else {
        case_number
    };
    format!(
        "{}-{}-r{}",
        dataset_year,
        safe_slug(id_base),
        source_row_number
    )
}
