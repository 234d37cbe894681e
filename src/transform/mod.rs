mod columns;

pub use columns::{ColumnUniverse, MAX_DATA_COLS, normalize_column_name};

use indexmap::IndexMap;

use crate::excel::Sheet;

/// Column names reserved for the run metadata stamped onto every row.
pub const META_COLUMNS: [&str; 2] = ["source_sheet", "load_date"];

/// A row in the fixed 12-field output shape: the two meta columns plus
/// `col1`..`col10`. `slots` is always `MAX_DATA_COLS` long; an empty
/// slot means the row's sheet had no value for that column.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub source_sheet: String,
    pub load_date: String,
    pub slots: Vec<Option<String>>,
}

/// Outer-union every sheet's rows into output rows stamped with the
/// logical date. Sheets are processed in workbook order and row order is
/// preserved within a sheet. Returns the rows together with the selected
/// (sorted, possibly truncated) column list.
pub fn unify(sheets: &[Sheet], logical_date: &str) -> (Vec<OutputRow>, Vec<String>) {
    let universe = ColumnUniverse::from_sheets(sheets);
    let selected = universe.selected().to_vec();

    let mut out = Vec::with_capacity(sheets.iter().map(Sheet::row_count).sum());
    for sheet in sheets {
        let normalized: Vec<String> = sheet
            .columns
            .iter()
            .map(|c| normalize_column_name(c))
            .collect();

        for row in &sheet.rows {
            // Last write wins when two headers normalize to the same name.
            let mut by_name: IndexMap<&str, &str> = IndexMap::new();
            for (name, value) in normalized.iter().zip(row) {
                by_name.insert(name.as_str(), value.as_str());
            }

            let slots = (0..MAX_DATA_COLS)
                .map(|i| {
                    selected
                        .get(i)
                        .and_then(|name| by_name.get(name.as_str()))
                        .map(|value| (*value).to_string())
                })
                .collect();

            out.push(OutputRow {
                source_sheet: sheet.name.clone(),
                load_date: logical_date.to_string(),
                slots,
            });
        }
    }

    (out, selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, columns: &[&str], rows: &[&[&str]]) -> Sheet {
        Sheet {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn two_sheet_outer_union() {
        let sheets = vec![
            sheet("SheetA", &["Name", "Age"], &[&["alice", "30"]]),
            sheet("SheetB", &["City"], &[&["hanoi"]]),
        ];

        let (rows, selected) = unify(&sheets, "2025-08-01");

        assert_eq!(selected, vec!["age", "city", "name"]);
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.source_sheet, "SheetA");
        assert_eq!(first.load_date, "2025-08-01");
        assert_eq!(first.slots[0].as_deref(), Some("30"));
        assert_eq!(first.slots[1], None);
        assert_eq!(first.slots[2].as_deref(), Some("alice"));

        let second = &rows[1];
        assert_eq!(second.source_sheet, "SheetB");
        assert_eq!(second.slots[0], None);
        assert_eq!(second.slots[1].as_deref(), Some("hanoi"));
        assert_eq!(second.slots[2], None);

        // col4..col10 stay empty for both.
        for row in &rows {
            assert_eq!(row.slots.len(), MAX_DATA_COLS);
            assert!(row.slots[3..].iter().all(Option::is_none));
        }
    }

    #[test]
    fn row_count_is_sum_of_sheet_row_counts() {
        let sheets = vec![
            sheet("A", &["x"], &[&["1"], &["2"]]),
            sheet("B", &["y"], &[&["3"], &["4"], &["5"]]),
            sheet("C", &["z"], &[]),
        ];

        let (rows, _) = unify(&sheets, "2025-08-01");
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn sheet_order_and_row_order_are_preserved() {
        let sheets = vec![
            sheet("Zeta", &["v"], &[&["z1"], &["z2"]]),
            sheet("Alpha", &["v"], &[&["a1"]]),
        ];

        let (rows, _) = unify(&sheets, "2025-08-01");
        let origins: Vec<&str> = rows.iter().map(|r| r.source_sheet.as_str()).collect();
        assert_eq!(origins, vec!["Zeta", "Zeta", "Alpha"]);
        assert_eq!(rows[0].slots[0].as_deref(), Some("z1"));
        assert_eq!(rows[1].slots[0].as_deref(), Some("z2"));
    }

    #[test]
    fn universe_wider_than_ten_truncates_to_first_ten() {
        let columns: Vec<String> = (b'a'..=b'l').map(|c| (c as char).to_string()).collect();
        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        let values: Vec<&str> = vec!["v"; column_refs.len()];

        let sheets = vec![sheet("Wide", &column_refs, &[&values])];
        let (rows, selected) = unify(&sheets, "2025-08-01");

        assert_eq!(selected.len(), MAX_DATA_COLS);
        assert_eq!(selected.first().map(String::as_str), Some("a"));
        assert_eq!(selected.last().map(String::as_str), Some("j"));
        // "k" and "l" fall off; every kept slot is filled.
        assert!(rows[0].slots.iter().all(Option::is_some));
    }

    #[test]
    fn normalization_collision_is_last_write_wins() {
        let sheets = vec![sheet(
            "S",
            &[" Name ", "name"],
            &[&["from_padded", "from_plain"]],
        )];

        let (rows, selected) = unify(&sheets, "2025-08-01");
        assert_eq!(selected, vec!["name"]);
        assert_eq!(rows[0].slots[0].as_deref(), Some("from_plain"));
    }

    #[test]
    fn every_row_is_stamped_with_the_logical_date() {
        let sheets = vec![
            sheet("A", &["x"], &[&["1"]]),
            sheet("B", &["x"], &[&["2"]]),
        ];

        let (rows, _) = unify(&sheets, "2030-12-31");
        assert!(rows.iter().all(|r| r.load_date == "2030-12-31"));
    }
}
