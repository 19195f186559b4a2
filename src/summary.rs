// src/summary.rs

use crate::normalize::{FirearmInvolved, Gender, SolvedStatus};
use crate::record::CanonicalRecord;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SUMMARY_HEADERS: &[&str] = &[
    "year",
    "victims",
    "female_victims",
    "age_30_or_younger",
    "firearm_cases",
    "solved_or_indicted",
];

/// Aggregate counts for one resolution year, main-tally records only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub victims: usize,
    pub female_victims: usize,
    pub age_30_or_younger: usize,
    pub firearm_cases: usize,
    pub solved_or_indicted: usize,
}

impl YearSummary {
    pub fn csv_row(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.victims.to_string(),
            self.female_victims.to_string(),
            self.age_30_or_younger.to_string(),
            self.firearm_cases.to_string(),
            self.solved_or_indicted.to_string(),
        ]
    }
}

/// Group main-tally records by resolution year and count. Supplementary
/// records never contribute; a record whose year cannot be resolved is
/// dropped from the summary rather than failing the aggregation. Output is
/// sorted by year.
pub fn summarize_by_year(records: &[CanonicalRecord]) -> Vec<YearSummary> {
    let mut buckets: BTreeMap<i32, Vec<&CanonicalRecord>> = BTreeMap::new();
    for record in records {
        if !record.included_in_main_tally {
            continue;
        }
        let Some(year) = record.resolution_year() else {
            continue;
        };
        buckets.entry(year).or_default().push(record);
    }

    buckets
        .into_iter()
        .map(|(year, rows)| YearSummary {
            year,
            victims: rows.len(),
            female_victims: rows.iter().filter(|r| r.gender == Gender::Female).count(),
            age_30_or_younger: rows
                .iter()
                .filter(|r| matches!(r.age, Some(a) if a > 0 && a <= 30))
                .count(),
            firearm_cases: rows
                .iter()
                .filter(|r| r.firearm_involved == FirearmInvolved::Yes)
                .count(),
            solved_or_indicted: rows
                .iter()
                .filter(|r| {
                    matches!(
                        r.solved_status,
                        SolvedStatus::SolvedIndicted | SolvedStatus::PartiallySolved
                    )
                })
                .count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{AgeGroup, CitizenStatus, WeaponType};

    fn record(year: i32, main: bool) -> CanonicalRecord {
        CanonicalRecord {
            record_uid: format!("{}-na-r2", year),
            source_file: format!("{}.csv", year),
            source_row_number: 2,
            dataset_year: year,
            serial_number: String::new(),
            record_group: if main { "Main".to_string() } else { "שוטר".to_string() },
            included_in_main_tally: main,
            case_number: String::new(),
            victim_name_he: "פלוני".to_string(),
            victim_name_ar: String::new(),
            age: None,
            age_group: AgeGroup::Unknown,
            gender_raw: String::new(),
            gender: Gender::Unknown,
            citizen_raw: String::new(),
            citizen_status: CitizenStatus::Unknown,
            religion: String::new(),
            residence_locality: String::new(),
            residence_locality_type: String::new(),
            residence_population_type: String::new(),
            geographic_area: String::new(),
            geographic_area_alt: String::new(),
            district_state: String::new(),
            district_police: String::new(),
            event_date_raw: String::new(),
            event_date_iso: None,
            death_date_raw: String::new(),
            death_date_iso: None,
            month_raw: String::new(),
            month_num: None,
            incident_location: String::new(),
            exact_location: String::new(),
            solved_raw: String::new(),
            solved_status: SolvedStatus::Unknown,
            police_status: String::new(),
            weapon_raw: String::new(),
            weapon_type: WeaponType::Unknown,
            weapon_detail: String::new(),
            firearm_involved: FirearmInvolved::Unknown,
            intent_raw: String::new(),
            background: String::new(),
            description: String::new(),
            notes: String::new(),
            source_url_1: String::new(),
            source_url_2: String::new(),
        }
    }

    #[test]
    fn supplementary_records_never_count() {
        let mut supplementary = record(2021, false);
        supplementary.gender = Gender::Female;
        supplementary.firearm_involved = FirearmInvolved::Yes;
        let records = vec![record(2021, true), supplementary];

        let summary = summarize_by_year(&records);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].victims, 1);
        assert_eq!(summary[0].female_victims, 0);
        assert_eq!(summary[0].firearm_cases, 0);
    }

    #[test]
    fn counts_per_year() {
        let mut a = record(2020, true);
        a.death_date_iso = Some("2020-05-02".to_string());
        a.gender = Gender::Female;
        a.age = Some(28);
        a.solved_status = SolvedStatus::PartiallySolved;

        let mut b = record(2020, true);
        b.death_date_iso = Some("2020-07-09".to_string());
        b.age = Some(31);
        b.firearm_involved = FirearmInvolved::Yes;
        b.solved_status = SolvedStatus::SolvedIndicted;

        let c = record(2021, true);

        let summary = summarize_by_year(&[a, b, c]);
        assert_eq!(
            summary,
            vec![
                YearSummary {
                    year: 2020,
                    victims: 2,
                    female_victims: 1,
                    age_30_or_younger: 1,
                    firearm_cases: 1,
                    solved_or_indicted: 2,
                },
                YearSummary {
                    year: 2021,
                    victims: 1,
                    female_victims: 0,
                    age_30_or_younger: 0,
                    firearm_cases: 0,
                    solved_or_indicted: 0,
                },
            ]
        );
    }

    #[test]
    fn death_date_year_outranks_dataset_year() {
        let mut r = record(2021, true);
        r.death_date_iso = Some("2022-01-03".to_string());
        let summary = summarize_by_year(&[r]);
        assert_eq!(summary[0].year, 2022);
    }
}
