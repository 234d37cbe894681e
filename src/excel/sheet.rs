/// One worksheet with its header split from the data rows. Every cell
/// has already been coerced to a string by the reader.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
