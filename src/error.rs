use std::path::PathBuf;

/// Failures that abort a run. Nothing here is retried internally; the
/// surrounding scheduler only sees the process exit nonzero.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("workbook not found at {}", .0.display())]
    MissingSource(PathBuf),

    #[error("database execution failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("DQ fail: 0 rows loaded for load_date={0}")]
    DataQuality(String),
}
