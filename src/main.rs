use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, prelude::*};

use sheetload::config::Config;
use sheetload::pipeline;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source workbook path
    #[arg(long, env = "EXCEL_PATH", default_value = "data/input.xlsx")]
    workbook: PathBuf,

    /// SQL file executed verbatim to create the destination table
    #[arg(long, env = "DDL_PATH", default_value = "sql/create_table.sql")]
    ddl: PathBuf,

    /// MySQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Destination table name
    #[arg(long, env = "TARGET_TABLE", default_value = "excel_combined")]
    table: String,

    /// Logical date of the run (yyyy-mm-dd); defaults to today
    #[arg(long, env = "LOAD_DATE")]
    date: Option<String>,

    /// Directory for the per-date staging CSV
    #[arg(long, default_value_os_t = std::env::temp_dir())]
    staging_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config {
        workbook_path: cli.workbook,
        ddl_path: cli.ddl,
        database_url: cli.database_url,
        table: cli.table,
        logical_date: cli.date.unwrap_or_else(Config::today),
        staging_dir: cli.staging_dir,
    };
    config.validate()?;

    let loaded = pipeline::run(&config).await?;
    println!("Loaded {} rows for load_date={}", loaded, config.logical_date);

    Ok(())
}
