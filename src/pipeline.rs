use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::error::PipelineError;
use crate::excel;
use crate::staging;
use crate::transform;

/// Run one batch: ensure the table, extract and transform the workbook,
/// load the staging file, then gate on the loaded row count. Steps are
/// strictly sequential; the first failure aborts everything downstream.
pub async fn run(config: &Config) -> Result<u64> {
    let ddl = fs::read_to_string(&config.ddl_path)
        .with_context(|| format!("Unable to read DDL file: {}", config.ddl_path.display()))?;

    let mut connection = db::connect(&config.database_url).await?;
    db::ensure_table(&mut connection, &ddl).await?;

    let staged = extract_transform(config)?;

    let rows = staging::read_staging(&staged)?;
    let loaded = db::load(&mut connection, &config.table, &config.logical_date, &rows).await?;
    info!(loaded, table = %config.table, "load committed");

    dq_check(loaded, &config.logical_date)?;
    Ok(loaded)
}

/// Extract every sheet, unify into the fixed output shape, and stage to
/// the per-date CSV. Returns the staging file path.
pub fn extract_transform(config: &Config) -> Result<PathBuf> {
    let sheets = excel::read_workbook(&config.workbook_path)?;
    let (rows, selected) = transform::unify(&sheets, &config.logical_date);
    let path = staging::write_staging(&rows, &config.staging_dir, &config.logical_date)?;
    info!(
        rows = rows.len(),
        mapped_cols = ?selected,
        staged = %path.display(),
        "extraction complete"
    );
    Ok(path)
}

/// The only data-quality check: an empty load fails the run.
pub fn dq_check(loaded: u64, logical_date: &str) -> Result<()> {
    if loaded == 0 {
        return Err(PipelineError::DataQuality(logical_date.to_string()).into());
    }
    Ok(())
}
