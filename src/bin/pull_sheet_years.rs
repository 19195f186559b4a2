// src/bin/pull_sheet_years.rs
//
// Pull each yearly tab of the source Google Sheet into raw_csv/<year>.csv.
// Years are fetched sequentially; any year that fails, returns an HTML error
// page, or duplicates an earlier year's payload is skipped rather than
// aborting the run. Afterwards the raw directory is reduced to exactly the
// year files fetched this run.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use glob::glob;
use homicide_tracker::fetch::{
    csv_row_count, detect_start_year, fetch_sheet_tab, is_year_filename, DEFAULT_SHEET_ID,
};
use reqwest::Client;
use std::{
    collections::{HashMap, HashSet},
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    let raw_dir = PathBuf::from("raw_csv");
    fs::create_dir_all(&raw_dir)?;

    let sheet_id = env::var("GOOGLE_SHEET_ID").unwrap_or_else(|_| DEFAULT_SHEET_ID.to_string());
    let start_year = year_from_env("SHEET_START_YEAR")?.unwrap_or_else(|| detect_start_year(&raw_dir));
    let end_year = year_from_env("SHEET_END_YEAR")?.unwrap_or_else(|| Utc::now().year() + 1);
    if start_year > end_year {
        bail!("invalid year range: start={}, end={}", start_year, end_year);
    }
    info!(start_year, end_year, "pulling sheet tabs");

    let client = Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(30))
        .build()?;

    let mut fetched_years: Vec<i32> = Vec::new();
    // Tabs that don't exist come back as a copy of the first sheet; identical
    // payloads under two year names are kept only for the first year.
    let mut seen_payloads: HashMap<String, i32> = HashMap::new();

    for year in start_year..=end_year {
        let body = match fetch_sheet_tab(&client, &sheet_id, year).await {
            Ok(body) => body,
            Err(err) => {
                warn!(year, "skipped: {:#}", err);
                continue;
            }
        };

        let Some(rows) = csv_row_count(&body) else {
            warn!(year, "skipped: not a valid CSV payload");
            continue;
        };

        if let Some(&first_year) = seen_payloads.get(&body) {
            warn!(year, first_year, "skipped: duplicate payload");
            continue;
        }

        let target = raw_dir.join(format!("{}.csv", year));
        let temp = raw_dir.join(format!("{}.csv.tmp", year));
        fs::write(&temp, &body).with_context(|| format!("writing {}", temp.display()))?;
        fs::rename(&temp, &target).with_context(|| format!("renaming to {}", target.display()))?;

        seen_payloads.insert(body, year);
        fetched_years.push(year);
        info!(year, rows, "saved {}", target.display());
    }

    if fetched_years.is_empty() {
        bail!("no valid yearly CSV tabs were fetched from sheet {}", sheet_id);
    }

    prune_raw_dir(&raw_dir, &fetched_years)?;

    fetched_years.sort_unstable();
    info!("completed sheet pull for years: {:?}", fetched_years);
    Ok(())
}

fn year_from_env(var: &str) -> Result<Option<i32>> {
    match env::var(var) {
        Ok(value) => {
            let year = value
                .parse()
                .with_context(|| format!("{} must be a year, got {:?}", var, value))?;
            Ok(Some(year))
        }
        Err(_) => Ok(None),
    }
}

/// Keep the raw directory year-tab-only: drop files that are not named
/// `YYYY.csv` and year files that were not refreshed by this run.
fn prune_raw_dir(raw_dir: &Path, fetched_years: &[i32]) -> Result<()> {
    let fetched: HashSet<String> = fetched_years.iter().map(|y| format!("{}.csv", y)).collect();
    let pattern = format!("{}/*.csv", raw_dir.display());

    for entry in glob(&pattern)? {
        let path = entry?;
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(String::from) else {
            continue;
        };
        if is_year_filename(&name) && fetched.contains(&name) {
            continue;
        }
        fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        if is_year_filename(&name) {
            info!(file = %name, "removed stale year file");
        } else {
            info!(file = %name, "removed non-year raw file");
        }
    }
    Ok(())
}
