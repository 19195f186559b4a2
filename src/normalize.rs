// src/normalize.rs
//
// Pure classifiers mapping raw free-text (mostly Hebrew) cell values to
// closed enums. Rules are ordered; the first match wins. Everything falls
// back to `Unknown` for unrecognized or empty input.

use crate::text::{clean_text, WHITESPACE};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static DIGITS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("regex should parse"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CitizenStatus {
    Citizen,
    #[serde(rename = "Non-citizen")]
    NonCitizen,
    Unknown,
}

impl CitizenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CitizenStatus::Citizen => "Citizen",
            CitizenStatus::NonCitizen => "Non-citizen",
            CitizenStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolvedStatus {
    #[serde(rename = "Solved/Indicted")]
    SolvedIndicted,
    #[serde(rename = "Partially Solved")]
    PartiallySolved,
    Unsolved,
    Unknown,
}

impl SolvedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolvedStatus::SolvedIndicted => "Solved/Indicted",
            SolvedStatus::PartiallySolved => "Partially Solved",
            SolvedStatus::Unsolved => "Unsolved",
            SolvedStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeaponType {
    Firearm,
    #[serde(rename = "Sharp Object")]
    SharpObject,
    Vehicle,
    Strangulation,
    Explosive,
    Other,
    Unknown,
}

impl WeaponType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponType::Firearm => "Firearm",
            WeaponType::SharpObject => "Sharp Object",
            WeaponType::Vehicle => "Vehicle",
            WeaponType::Strangulation => "Strangulation",
            WeaponType::Explosive => "Explosive",
            WeaponType::Other => "Other",
            WeaponType::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FirearmInvolved {
    Yes,
    No,
    Unknown,
}

impl FirearmInvolved {
    pub fn as_str(&self) -> &'static str {
        match self {
            FirearmInvolved::Yes => "Yes",
            FirearmInvolved::No => "No",
            FirearmInvolved::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "0-17")]
    Minor,
    #[serde(rename = "18-24")]
    YoungAdult,
    #[serde(rename = "25-29")]
    LateTwenties,
    #[serde(rename = "30-39")]
    Thirties,
    #[serde(rename = "40-49")]
    Forties,
    #[serde(rename = "50-64")]
    MiddleAged,
    #[serde(rename = "65+")]
    Senior,
    Unknown,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Minor => "0-17",
            AgeGroup::YoungAdult => "18-24",
            AgeGroup::LateTwenties => "25-29",
            AgeGroup::Thirties => "30-39",
            AgeGroup::Forties => "40-49",
            AgeGroup::MiddleAged => "50-64",
            AgeGroup::Senior => "65+",
            AgeGroup::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalize_gender(raw: &str) -> Gender {
    let text = clean_text(raw);
    if text.is_empty() {
        return Gender::Unknown;
    }
    if text.contains("גבר") || text == "ז" {
        return Gender::Male;
    }
    if text.contains("אישה") || text.contains("אשה") || text.contains("נקבה") || text == "נ" {
        return Gender::Female;
    }
    Gender::Unknown
}

pub fn normalize_citizen_status(raw: &str) -> CitizenStatus {
    let text = clean_text(raw);
    if text.is_empty() {
        return CitizenStatus::Unknown;
    }
    if text.contains("כן") {
        return CitizenStatus::Citizen;
    }
    if text.contains("לא") {
        return CitizenStatus::NonCitizen;
    }
    CitizenStatus::Unknown
}

/// The solved field and the free-text police-status field are judged
/// together; an indictment mention anywhere outranks everything else.
pub fn normalize_solved_status(solved_raw: &str, police_status_raw: &str) -> SolvedStatus {
    let solved_text = clean_text(solved_raw);
    let merged = merge_nonempty(&solved_text, &clean_text(police_status_raw));
    if merged.is_empty() {
        return SolvedStatus::Unknown;
    }
    if merged.contains("כתב אישום") {
        return SolvedStatus::SolvedIndicted;
    }
    if merged.contains("עצור") || merged.contains("מעצר") {
        return SolvedStatus::PartiallySolved;
    }
    if merged.contains("לא פוענח") || solved_text == "לא" {
        return SolvedStatus::Unsolved;
    }
    if solved_text == "כן" || merged.contains("פוענח") {
        return SolvedStatus::SolvedIndicted;
    }
    SolvedStatus::Unknown
}

pub fn normalize_weapon_type(weapon_raw: &str, detail_raw: &str) -> WeaponType {
    let text = merge_nonempty(&clean_text(weapon_raw), &clean_text(detail_raw));
    if text.is_empty() {
        return WeaponType::Unknown;
    }
    if text.contains("ירי") {
        return WeaponType::Firearm;
    }
    if text.contains("דקירה") || text.contains("סכין") {
        return WeaponType::SharpObject;
    }
    if text.contains("דריסה") {
        return WeaponType::Vehicle;
    }
    if text.contains("חניקה") {
        return WeaponType::Strangulation;
    }
    if text.contains("מטען") || text.contains("פיצוץ") {
        return WeaponType::Explosive;
    }
    WeaponType::Other
}

pub fn normalize_firearm(weapon_raw: &str, detail_raw: &str) -> FirearmInvolved {
    let text = merge_nonempty(&clean_text(weapon_raw), &clean_text(detail_raw));
    if text.is_empty() {
        return FirearmInvolved::Unknown;
    }
    if text.contains("ירי") || text == "כן" {
        return FirearmInvolved::Yes;
    }
    if text == "לא"
        || text.contains("דקירה")
        || text.contains("סכין")
        || text.contains("חניקה")
        || text.contains("דריסה")
    {
        return FirearmInvolved::No;
    }
    FirearmInvolved::Unknown
}

pub fn age_group(age: Option<u32>) -> AgeGroup {
    match age {
        None => AgeGroup::Unknown,
        Some(0..=17) => AgeGroup::Minor,
        Some(18..=24) => AgeGroup::YoungAdult,
        Some(25..=29) => AgeGroup::LateTwenties,
        Some(30..=39) => AgeGroup::Thirties,
        Some(40..=49) => AgeGroup::Forties,
        Some(50..=64) => AgeGroup::MiddleAged,
        Some(_) => AgeGroup::Senior,
    }
}

/// Canonicalize state-district names: fold maqaf to hyphen, collapse
/// whitespace, and map known spelling and definite-article variants to one
/// written form. `#N/A` spreadsheet artifacts become empty.
pub fn normalize_district_state(raw: &str) -> String {
    let text = clean_text(raw);
    if text.is_empty() || text == "#N/A" {
        return String::new();
    }

    let dashed = text.replace('־', "-");
    let collapsed = WHITESPACE.replace_all(&dashed, " ").trim().to_string();

    match collapsed.as_str() {
        "תל-אביב" | "תל אביב-יפו" => "תל אביב".to_string(),
        "המרכז" => "מרכז".to_string(),
        "הצפון" => "צפון".to_string(),
        "הדרום" | "דרם" => "דרום".to_string(),
        _ => collapsed,
    }
}

/// Classification of a source row into the primary victim count versus a
/// supplementary category (for example security personnel recorded in the
/// same sheet). A non-numeric serial number is the source's convention for
/// supplementary rows, and its text becomes the group label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordClass {
    pub group: String,
    pub main_tally: bool,
}

/// Precedence here is load-bearing: the empty-serial branches and the
/// serial-as-label branch interact for specific supplementary rows, so keep
/// the order exactly as written.
pub fn classify_record(serial_number: &str, case_number: &str) -> RecordClass {
    let serial = clean_text(serial_number);
    let case_id = clean_text(case_number);

    if DIGITS_ONLY.is_match(&serial) {
        return RecordClass {
            group: "Main".to_string(),
            main_tally: true,
        };
    }
    if serial.is_empty() && DIGITS_ONLY.is_match(&case_id) {
        return RecordClass {
            group: "Main".to_string(),
            main_tally: true,
        };
    }
    if serial.is_empty() {
        return RecordClass {
            group: "Main".to_string(),
            main_tally: true,
        };
    }

    RecordClass {
        group: serial,
        main_tally: false,
    }
}

fn merge_nonempty(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => String::new(),
        (false, true) => a.to_string(),
        (true, false) => b.to_string(),
        (false, false) => format!("{} {}", a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_word_and_single_letter_codes() {
        assert_eq!(normalize_gender("גבר"), Gender::Male);
        assert_eq!(normalize_gender("ז"), Gender::Male);
        assert_eq!(normalize_gender("אישה"), Gender::Female);
        assert_eq!(normalize_gender("אשה"), Gender::Female);
        assert_eq!(normalize_gender("נקבה"), Gender::Female);
        assert_eq!(normalize_gender("נ"), Gender::Female);
        assert_eq!(normalize_gender("לא ידוע"), Gender::Unknown);
        assert_eq!(normalize_gender(""), Gender::Unknown);
    }

    #[test]
    fn citizen_status_words() {
        assert_eq!(normalize_citizen_status("כן"), CitizenStatus::Citizen);
        assert_eq!(normalize_citizen_status("לא"), CitizenStatus::NonCitizen);
        assert_eq!(normalize_citizen_status("?"), CitizenStatus::Unknown);
    }

    #[test]
    fn solved_status_indictment_outranks_arrest() {
        assert_eq!(
            normalize_solved_status("", "כתב אישום הוגש, עצור אחד"),
            SolvedStatus::SolvedIndicted
        );
        assert_eq!(
            normalize_solved_status("", "שני עצורים"),
            SolvedStatus::PartiallySolved
        );
        assert_eq!(
            normalize_solved_status("לא פוענח", ""),
            SolvedStatus::Unsolved
        );
        assert_eq!(normalize_solved_status("לא", ""), SolvedStatus::Unsolved);
        assert_eq!(
            normalize_solved_status("כן", ""),
            SolvedStatus::SolvedIndicted
        );
        assert_eq!(
            normalize_solved_status("פוענח", ""),
            SolvedStatus::SolvedIndicted
        );
        assert_eq!(normalize_solved_status("", ""), SolvedStatus::Unknown);
    }

    #[test]
    fn weapon_priority_shooting_wins_over_stabbing() {
        assert_eq!(
            normalize_weapon_type("ירי ודקירה", ""),
            WeaponType::Firearm
        );
        assert_eq!(normalize_weapon_type("דקירה", ""), WeaponType::SharpObject);
        assert_eq!(normalize_weapon_type("", "סכין"), WeaponType::SharpObject);
        assert_eq!(normalize_weapon_type("דריסה", ""), WeaponType::Vehicle);
        assert_eq!(normalize_weapon_type("חניקה", ""), WeaponType::Strangulation);
        assert_eq!(normalize_weapon_type("מטען חבלה", ""), WeaponType::Explosive);
        assert_eq!(normalize_weapon_type("אלימות", ""), WeaponType::Other);
        assert_eq!(normalize_weapon_type("", ""), WeaponType::Unknown);
    }

    #[test]
    fn firearm_involvement() {
        assert_eq!(normalize_firearm("ירי", ""), FirearmInvolved::Yes);
        assert_eq!(normalize_firearm("כן", ""), FirearmInvolved::Yes);
        assert_eq!(normalize_firearm("לא", ""), FirearmInvolved::No);
        assert_eq!(normalize_firearm("סכין", ""), FirearmInvolved::No);
        assert_eq!(normalize_firearm("אחר", ""), FirearmInvolved::Unknown);
        assert_eq!(normalize_firearm("", ""), FirearmInvolved::Unknown);
    }

    #[test]
    fn age_buckets() {
        assert_eq!(age_group(Some(0)), AgeGroup::Minor);
        assert_eq!(age_group(Some(17)), AgeGroup::Minor);
        assert_eq!(age_group(Some(18)), AgeGroup::YoungAdult);
        assert_eq!(age_group(Some(29)), AgeGroup::LateTwenties);
        assert_eq!(age_group(Some(30)), AgeGroup::Thirties);
        assert_eq!(age_group(Some(64)), AgeGroup::MiddleAged);
        assert_eq!(age_group(Some(65)), AgeGroup::Senior);
        assert_eq!(age_group(None), AgeGroup::Unknown);
    }

    #[test]
    fn district_variants_fold_to_one_form() {
        assert_eq!(normalize_district_state("תל-אביב"), "תל אביב");
        assert_eq!(normalize_district_state("תל אביב-יפו"), "תל אביב");
        assert_eq!(normalize_district_state("המרכז"), "מרכז");
        assert_eq!(normalize_district_state("הצפון"), "צפון");
        assert_eq!(normalize_district_state("דרם"), "דרום");
        assert_eq!(normalize_district_state("חיפה"), "חיפה");
        assert_eq!(normalize_district_state("#N/A"), "");
    }

    #[test]
    fn record_classification_precedence() {
        assert_eq!(
            classify_record("12", ""),
            RecordClass {
                group: "Main".to_string(),
                main_tally: true
            }
        );
        assert_eq!(
            classify_record("", "A-55"),
            RecordClass {
                group: "Main".to_string(),
                main_tally: true
            }
        );
        assert_eq!(
            classify_record("", "77"),
            RecordClass {
                group: "Main".to_string(),
                main_tally: true
            }
        );
        assert_eq!(
            classify_record("שוטר", "123"),
            RecordClass {
                group: "שוטר".to_string(),
                main_tally: false
            }
        );
    }
}
