use anyhow::{Context, Result};
use calamine::{DataType, Reader, open_workbook_auto};
use std::path::Path;

use crate::error::PipelineError;
use crate::excel::Sheet;

/// Read every sheet of the workbook in source order, coercing all cells
/// to strings so no numeric or date formatting is lost on the way
/// through. The first row of each sheet is taken as its header.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<Sheet>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PipelineError::MissingSource(path.to_path_buf()).into());
    }

    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Unable to parse Excel file: {}", path.display()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .with_context(|| format!("Unable to read worksheet: {}", name))?;
        sheets.push(sheet_from_range(name, range?));
    }

    if sheets.is_empty() {
        anyhow::bail!("No worksheets found in file");
    }

    Ok(sheets)
}

fn sheet_from_range(name: &str, range: calamine::Range<DataType>) -> Sheet {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

    let columns = rows.next().unwrap_or_default();
    let rows = rows.collect();

    Sheet {
        name: name.to_string(),
        columns,
        rows,
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Float(f) => {
            // Render integral floats without the trailing ".0" Excel
            // stores them with
            if *f == (*f as i64) as f64 && f.abs() < 1e10 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        DataType::Error(e) => format!("Error: {:?}", e),
        DataType::DateTime(dt) => dt.to_string(),
        DataType::Duration(d) => d.to_string(),
        DataType::DateTimeIso(s) | DataType::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;
    use std::path::PathBuf;

    fn write_fixture(dir: &Path) -> PathBuf {
        let path = dir.join("input.xlsx");
        let mut workbook = XlsxWorkbook::new();

        let sheet_a = workbook.add_worksheet();
        sheet_a.set_name("SheetA").unwrap();
        sheet_a.write_string(0, 0, "Name").unwrap();
        sheet_a.write_string(0, 1, "Age").unwrap();
        sheet_a.write_string(1, 0, "alice").unwrap();
        sheet_a.write_number(1, 1, 30.0).unwrap();

        let sheet_b = workbook.add_worksheet();
        sheet_b.set_name("SheetB").unwrap();
        sheet_b.write_string(0, 0, "City").unwrap();
        sheet_b.write_string(1, 0, "hanoi").unwrap();
        sheet_b.write_number(2, 0, 1.5).unwrap();

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn reads_all_sheets_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let sheets = read_workbook(write_fixture(dir.path())).unwrap();

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "SheetA");
        assert_eq!(sheets[1].name, "SheetB");
        assert_eq!(sheets[0].columns, vec!["Name", "Age"]);
        assert_eq!(sheets[0].rows, vec![vec!["alice", "30"]]);
        assert_eq!(sheets[1].row_count(), 2);
    }

    #[test]
    fn numbers_come_back_as_strings() {
        let dir = tempfile::tempdir().unwrap();
        let sheets = read_workbook(write_fixture(dir.path())).unwrap();

        // Integral float renders without ".0", fractional keeps it.
        assert_eq!(sheets[0].rows[0][1], "30");
        assert_eq!(sheets[1].rows[1][0], "1.5");
    }

    #[test]
    fn missing_file_is_a_missing_source_error() {
        let err = read_workbook("/nonexistent/input.xlsx").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingSource(_))
        ));
    }
}
