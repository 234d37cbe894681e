mod sheet;
mod workbook;

pub use sheet::Sheet;
pub use workbook::read_workbook;
