// src/output.rs

use crate::record::{CanonicalRecord, OUTPUT_HEADERS};
use crate::summary::{YearSummary, SUMMARY_HEADERS};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Write the normalized CSV with the fixed canonical column order.
pub fn write_normalized_csv(path: &Path, records: &[CanonicalRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(OUTPUT_HEADERS)?;
    for record in records {
        writer.write_record(record.csv_row())?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))
}

/// Write the normalized JSON: a pretty-printed flat array of records. This
/// is the dashboard's sole data source.
pub fn write_normalized_json(path: &Path, records: &[CanonicalRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("serializing normalized records")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Write the per-year summary CSV.
pub fn write_year_summary_csv(path: &Path, summaries: &[YearSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(SUMMARY_HEADERS)?;
    for summary in summaries {
        writer.write_record(summary.csv_row())?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline;
    use crate::summary::summarize_by_year;
    use std::io::Write;

    const HEADER: &str = "מסד,מספר מקרה,שם הקורבן,גיל,מין,תאריך אירוע,תאריך פטירה,כלי רצח,פוענח";

    fn seed_raw_dir(dir: &Path) {
        for (name, row) in [
            ("2020.csv", "1,201,אבי כהן,28,גבר,2/5,2/5,ירי,כן"),
            ("2021.csv", "1,301,דנה לוי,52,אישה,3/6,4/6,דקירה,לא"),
        ] {
            let mut f = fs::File::create(dir.join(name)).unwrap();
            writeln!(f, "{HEADER}").unwrap();
            writeln!(f, "{row}").unwrap();
            writeln!(f, "2,,,,,,,,").unwrap();
        }
    }

    #[test]
    fn outputs_are_deterministic_across_reruns() {
        let raw = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        seed_raw_dir(raw.path());

        let mut artifacts = Vec::new();
        for pass in 0..2 {
            let records = pipeline::run(raw.path()).unwrap();
            let summaries = summarize_by_year(&records);

            let csv_path = out.path().join(format!("normalized_{pass}.csv"));
            let json_path = out.path().join(format!("normalized_{pass}.json"));
            let summary_path = out.path().join(format!("summary_{pass}.csv"));
            write_normalized_csv(&csv_path, &records).unwrap();
            write_normalized_json(&json_path, &records).unwrap();
            write_year_summary_csv(&summary_path, &summaries).unwrap();

            artifacts.push((
                fs::read(&csv_path).unwrap(),
                fs::read(&json_path).unwrap(),
                fs::read(&summary_path).unwrap(),
            ));
        }
        assert_eq!(artifacts[0], artifacts[1]);
    }

    #[test]
    fn end_to_end_counts_and_shape() {
        let raw = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        seed_raw_dir(raw.path());

        let records = pipeline::run(raw.path()).unwrap();
        assert_eq!(records.len(), 2);

        let summaries = summarize_by_year(&records);
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.victims == 1));

        let json_path = out.path().join("normalized.json");
        write_normalized_json(&json_path, &records).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 2);
        // Flat objects with the canonical field names, exactly one per header.
        for item in array {
            let obj = item.as_object().unwrap();
            assert_eq!(obj.len(), OUTPUT_HEADERS.len());
            for header in OUTPUT_HEADERS {
                assert!(obj.contains_key(*header), "missing field {header}");
            }
        }
        assert_eq!(array[0]["gender"], "Male");
        assert_eq!(array[1]["weapon_type"], "Sharp Object");
        assert_eq!(array[1]["solved_status"], "Unsolved");

        let csv_path = out.path().join("normalized.csv");
        write_normalized_csv(&csv_path, &records).unwrap();
        let text = fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("record_uid,source_file,"));
        assert_eq!(text.lines().count(), 3);
    }
}
