// src/pipeline.rs

use crate::dates::{infer_month, normalize_date_pair};
use crate::extract::{first_present_value, is_non_person_record};
use crate::headers::{build_header_map, Field, HEADER_ANCHOR};
use crate::normalize::{
    age_group, classify_record, normalize_citizen_status, normalize_district_state,
    normalize_firearm, normalize_gender, normalize_solved_status, normalize_weapon_type,
};
use crate::record::{build_record_uid, CanonicalRecord};
use crate::text::clean_text;
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use glob::glob;
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

static YEAR_IN_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}").expect("regex should parse"));

/// Ages above this are treated as transcription errors and dropped.
const MAX_PLAUSIBLE_AGE: u32 = 120;

/// Dataset year embedded in a source filename, e.g. `2021.csv`. Files without
/// a 4-digit year cannot be normalized (the year is the date fallback).
pub fn dataset_year_from_filename(filename: &str) -> Option<i32> {
    YEAR_IN_FILENAME
        .find(filename)
        .and_then(|m| m.as_str().parse().ok())
}

/// Read every row of a CSV file into memory. The bytes are decoded lossily
/// first; the per-cell cleaner strips whatever replacement characters that
/// leaves behind. Rows are flexible-width, headers are located later.
pub fn load_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let decoded = String::from_utf8_lossy(&bytes).into_owned();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(decoded));

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows)
}

/// Index of the first row containing the anchor header label. Source files
/// carry title/preamble rows above the real header.
pub fn find_header_row(rows: &[Vec<String>]) -> Option<usize> {
    rows.iter()
        .position(|row| row.iter().any(|cell| clean_text(cell).contains(HEADER_ANCHOR)))
}

/// Normalize one source file into canonical records. A file without a
/// dataset year in its name or without a detectable header row contributes
/// nothing; both cases are logged and skipped, never fatal.
#[tracing::instrument(level = "info", skip(path), fields(file = %path.as_ref().display()))]
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<Vec<CanonicalRecord>> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(dataset_year) = dataset_year_from_filename(&filename) else {
        warn!(file = %filename, "no 4-digit year in filename, skipping file");
        return Ok(Vec::new());
    };

    let rows = load_rows(path)?;
    let Some(header_idx) = find_header_row(&rows) else {
        warn!(file = %filename, "no header row found, skipping file");
        return Ok(Vec::new());
    };
    let header_map = build_header_map(&rows[header_idx]);

    let mut records = Vec::new();
    for (offset, row) in rows[header_idx + 1..].iter().enumerate() {
        // 1-based physical position in the file.
        let source_row_number = header_idx + offset + 2;

        let victim_name_he = first_present_value(row, &header_map, Field::VictimNameHe);
        if victim_name_he.is_empty() || is_non_person_record(&victim_name_he) {
            continue;
        }

        let serial_number = first_present_value(row, &header_map, Field::SerialNumber);
        let case_number = first_present_value(row, &header_map, Field::CaseNumber);
        let class = classify_record(&serial_number, &case_number);

        let age = crate::text::parse_int(&first_present_value(row, &header_map, Field::Age))
            .filter(|a| *a <= MAX_PLAUSIBLE_AGE);

        let gender_raw = first_present_value(row, &header_map, Field::Gender);
        let citizen_raw = first_present_value(row, &header_map, Field::Citizen);

        let event_date_raw = first_present_value(row, &header_map, Field::EventDate);
        let death_date_raw = first_present_value(row, &header_map, Field::DeathDate);
        let (event_date, death_date) =
            normalize_date_pair(&event_date_raw, &death_date_raw, dataset_year);

        // A row with no serial, case, dates or age carries no identifying
        // data at all; it is decoration, not a victim record.
        if serial_number.is_empty()
            && case_number.is_empty()
            && event_date_raw.is_empty()
            && death_date_raw.is_empty()
            && age.is_none()
        {
            continue;
        }

        let month_raw = first_present_value(row, &header_map, Field::Month);
        let month_num = infer_month(&month_raw, event_date.as_ref(), death_date.as_ref());

        let solved_raw = first_present_value(row, &header_map, Field::Solved);
        let police_status = first_present_value(row, &header_map, Field::PoliceStatus);
        let weapon_raw = first_present_value(row, &header_map, Field::WeaponMain);
        let weapon_detail = first_present_value(row, &header_map, Field::WeaponDetail);

        records.push(CanonicalRecord {
            record_uid: build_record_uid(
                dataset_year,
                &case_number,
                &serial_number,
                source_row_number,
            ),
            source_file: filename.clone(),
            source_row_number,
            dataset_year,
            serial_number,
            record_group: class.group,
            included_in_main_tally: class.main_tally,
            case_number,
            victim_name_he,
            victim_name_ar: first_present_value(row, &header_map, Field::VictimNameAr),
            age,
            age_group: age_group(age),
            gender: normalize_gender(&gender_raw),
            gender_raw,
            citizen_status: normalize_citizen_status(&citizen_raw),
            citizen_raw,
            religion: first_present_value(row, &header_map, Field::Religion),
            residence_locality: first_present_value(row, &header_map, Field::ResidenceLocality),
            residence_locality_type: first_present_value(
                row,
                &header_map,
                Field::ResidenceLocalityType,
            ),
            residence_population_type: first_present_value(
                row,
                &header_map,
                Field::ResidencePopulationType,
            ),
            geographic_area: first_present_value(row, &header_map, Field::GeographicArea),
            geographic_area_alt: first_present_value(row, &header_map, Field::GeographicAreaAlt),
            district_state: normalize_district_state(&first_present_value(
                row,
                &header_map,
                Field::DistrictState,
            )),
            district_police: first_present_value(row, &header_map, Field::DistrictPolice),
            event_date_raw,
            event_date_iso: event_date.map(|d| d.iso()),
            death_date_raw,
            death_date_iso: death_date.map(|d| d.iso()),
            month_raw,
            month_num,
            incident_location: first_present_value(row, &header_map, Field::IncidentLocation),
            exact_location: first_present_value(row, &header_map, Field::ExactLocation),
            solved_status: normalize_solved_status(&solved_raw, &police_status),
            solved_raw,
            police_status,
            weapon_type: normalize_weapon_type(&weapon_raw, &weapon_detail),
            firearm_involved: normalize_firearm(&weapon_raw, &weapon_detail),
            weapon_raw,
            weapon_detail,
            intent_raw: first_present_value(row, &header_map, Field::Intent),
            background: first_present_value(row, &header_map, Field::Background),
            description: first_present_value(row, &header_map, Field::Description),
            notes: first_present_value(row, &header_map, Field::Notes),
            source_url_1: first_present_value(row, &header_map, Field::SourceUrl1),
            source_url_2: first_present_value(row, &header_map, Field::SourceUrl2),
        });
    }

    info!(file = %filename, records = records.len(), "normalized file");
    Ok(records)
}

/// Normalize every yearly CSV under `raw_dir`, in lexical filename order so
/// reruns are byte-identical. Zero input files is fatal; there is nothing to
/// normalize.
pub fn run(raw_dir: &Path) -> Result<Vec<CanonicalRecord>> {
    let pattern = format!("{}/*.csv", raw_dir.display());
    let mut paths: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("bad glob pattern {}", pattern))?
        .filter_map(|entry| entry.ok())
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("no CSV files found in {}", raw_dir.display());
    }

    let mut records = Vec::new();
    for path in &paths {
        records.extend(process_file(path)?);
    }
    info!(
        files = paths.len(),
        records = records.len(),
        "normalization complete"
    );
    Ok(records)
}
