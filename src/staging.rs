use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::transform::{MAX_DATA_COLS, OutputRow};

/// Header of the staging file: the two meta columns, then `col1..col10`.
pub fn header() -> Vec<String> {
    let mut columns = vec!["source_sheet".to_string(), "load_date".to_string()];
    columns.extend((1..=MAX_DATA_COLS).map(|i| format!("col{i}")));
    columns
}

/// Deterministic per-date staging path, so a rerun overwrites its own
/// file and never another date's.
pub fn staging_path(dir: &Path, logical_date: &str) -> PathBuf {
    dir.join(format!("combined_{logical_date}.csv"))
}

/// Serialize the output rows for one run. Empty slots become empty CSV
/// fields.
pub fn write_staging(rows: &[OutputRow], dir: &Path, logical_date: &str) -> Result<PathBuf> {
    let path = staging_path(dir, logical_date);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Unable to create staging file: {}", path.display()))?;

    writer.write_record(header())?;
    for row in rows {
        let mut record: Vec<&str> = Vec::with_capacity(2 + MAX_DATA_COLS);
        record.push(&row.source_sheet);
        record.push(&row.load_date);
        for slot in &row.slots {
            record.push(slot.as_deref().unwrap_or(""));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(path)
}

/// Read a staging file back as string-typed rows. Empty fields come back
/// as empty slots; the distinction between a column a sheet never had
/// and a cell that held an empty string does not survive the round trip.
pub fn read_staging(path: &Path) -> Result<Vec<OutputRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Unable to open staging file: {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != 2 + MAX_DATA_COLS {
            anyhow::bail!(
                "Staging row has {} fields, expected {}",
                record.len(),
                2 + MAX_DATA_COLS
            );
        }

        let slots = record
            .iter()
            .skip(2)
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();

        rows.push(OutputRow {
            source_sheet: record[0].to_string(),
            load_date: record[1].to_string(),
            slots,
        });
    }

    Ok(rows)
}
