// src/fetch.rs
//
// Pulls yearly tabs of the source Google Sheet as CSV. This sits outside the
// normalization core: it runs sequentially, and a year that cannot be
// retrieved or does not look like CSV is skipped, never fatal to the run.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use glob::glob;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::{io::Cursor, path::Path};
use url::Url;

pub const DEFAULT_SHEET_ID: &str = "1AV2XmeezCqSK5IxSHFY3GqRRPEwUix0hv-LoOiPH5DE";

/// Earliest year to pull when the raw directory is empty.
pub const DEFAULT_START_YEAR: i32 = 2018;

const USER_AGENT: &str = "homicide-tracker-gsheet-sync/1.0";

static YEAR_STEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("regex should parse"));

/// gviz CSV export URL for one sheet tab named after the year.
pub fn sheet_tab_url(sheet_id: &str, year: i32) -> Result<Url> {
    let raw = format!(
        "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&sheet={}",
        sheet_id, year
    );
    Url::parse(&raw).with_context(|| format!("building sheet URL for year {}", year))
}

/// GET one year tab. Any HTTP-level failure surfaces as an error; the caller
/// decides to skip the year.
pub async fn fetch_sheet_tab(client: &Client, sheet_id: &str, year: i32) -> Result<String> {
    let url = sheet_tab_url(sheet_id, year)?;
    let body = client
        .get(url.as_str())
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()
        .with_context(|| format!("HTTP status for year {}", year))?
        .text()
        .await
        .with_context(|| format!("reading body for year {}", year))?;
    Ok(body)
}

/// Validate that a response body is a usable CSV payload and count its rows.
/// The sheet service answers HTML error pages with status 200, so the body
/// itself has to be inspected. `None` means the payload should be skipped.
pub fn csv_row_count(body: &str) -> Option<usize> {
    if body.trim().is_empty() {
        return None;
    }
    let stripped = body.trim_start();
    if stripped.starts_with("<!DOCTYPE html") || stripped.starts_with("<html") {
        return None;
    }

    let without_bom = body.strip_prefix('\u{FEFF}').unwrap_or(body);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(without_bom));

    let mut rows = 0usize;
    let mut any_content = false;
    for result in reader.records() {
        let record = result.ok()?;
        if record.iter().any(|cell| !cell.trim().is_empty()) {
            any_content = true;
        }
        rows += 1;
    }
    (rows > 0 && any_content).then_some(rows)
}

/// True for `YYYY.csv` basenames; anything else in the raw directory is
/// foreign and gets removed after a successful pull.
pub fn is_year_filename(filename: &str) -> bool {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| YEAR_STEM.is_match(stem))
        .unwrap_or(false)
}

/// Smallest year already on disk, or the default when the directory holds
/// no year files yet.
pub fn detect_start_year(raw_dir: &Path) -> i32 {
    let pattern = format!("{}/*.csv", raw_dir.display());
    let Ok(entries) = glob(&pattern) else {
        return DEFAULT_START_YEAR;
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .filter(|stem| YEAR_STEM.is_match(stem))
                .and_then(|stem| stem.parse().ok())
        })
        .min()
        .unwrap_or(DEFAULT_START_YEAR)
}
