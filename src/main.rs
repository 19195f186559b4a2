use anyhow::Result;
use homicide_tracker::{output, pipeline, summary};
use std::{fs, path::Path};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let raw_dir = Path::new("raw_csv");
    let data_dir = Path::new("data");
    fs::create_dir_all(data_dir)?;

    // ─── 3) normalize every yearly CSV ───────────────────────────────
    let records = pipeline::run(raw_dir)?;
    let summaries = summary::summarize_by_year(&records);

    // ─── 4) write all artifacts wholesale ────────────────────────────
    let normalized_csv = data_dir.join("homicides_normalized.csv");
    let normalized_json = data_dir.join("homicides_normalized.json");
    let year_summary_csv = data_dir.join("year_summary.csv");

    output::write_normalized_csv(&normalized_csv, &records)?;
    output::write_normalized_json(&normalized_json, &records)?;
    output::write_year_summary_csv(&year_summary_csv, &summaries)?;

    info!(
        records = records.len(),
        years = summaries.len(),
        "wrote {}, {} and {}",
        normalized_csv.display(),
        normalized_json.display(),
        year_summary_csv.display()
    );
    Ok(())
}
