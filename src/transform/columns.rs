use std::collections::BTreeSet;
use tracing::warn;

use crate::excel::Sheet;

/// The destination table holds ten positional data columns.
pub const MAX_DATA_COLS: usize = 10;

/// Trim, lowercase, spaces to underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// The deduplicated, normalized, lexicographically sorted set of data
/// column names observed across all sheets of a run, capped at
/// `MAX_DATA_COLS`. Meta column names are excluded even when a sheet
/// carries them as data.
#[derive(Debug, Clone)]
pub struct ColumnUniverse {
    selected: Vec<String>,
    dropped: usize,
}

impl ColumnUniverse {
    pub fn from_sheets(sheets: &[Sheet]) -> Self {
        let names: BTreeSet<String> = sheets
            .iter()
            .flat_map(|sheet| sheet.columns.iter())
            .map(|column| normalize_column_name(column))
            .filter(|column| !super::META_COLUMNS.contains(&column.as_str()))
            .collect();

        let total = names.len();
        let dropped = total.saturating_sub(MAX_DATA_COLS);
        if dropped > 0 {
            warn!(
                total,
                kept = MAX_DATA_COLS,
                "workbook has {total} data columns, keeping only the first {MAX_DATA_COLS}"
            );
        }

        Self {
            selected: names.into_iter().take(MAX_DATA_COLS).collect(),
            dropped,
        }
    }

    /// Sorted column names mapped to `col1..colN`, at most `MAX_DATA_COLS`.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// How many columns the cap discarded. Zero unless the workbook was
    /// wider than the table.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
