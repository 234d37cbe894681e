use anyhow::Result;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;

use crate::error::PipelineError;
use crate::staging;
use crate::transform::OutputRow;

/// Open a single connection to the destination database.
pub async fn connect(url: &str) -> Result<MySqlConnection> {
    let connection = MySqlConnectOptions::from_str(url)
        .map_err(PipelineError::Database)?
        .connect()
        .await
        .map_err(PipelineError::Database)?;
    Ok(connection)
}

/// Execute the externally supplied DDL so the destination table exists
/// before any data arrives. The statement is expected to be of a
/// "create if not exists" nature, which makes this idempotent.
pub async fn ensure_table(connection: &mut MySqlConnection, ddl: &str) -> Result<()> {
    sqlx::query(ddl)
        .execute(&mut *connection)
        .await
        .map_err(PipelineError::Database)?;
    Ok(())
}

/// Replace the logical date's rows inside one transaction: delete
/// whatever a prior run left for that date, then append every staged
/// row. Commit happens only on full success, so a failed run never
/// leaves the date partially loaded. Returns the number of rows
/// appended.
pub async fn load(
    connection: &mut MySqlConnection,
    table: &str,
    logical_date: &str,
    rows: &[OutputRow],
) -> Result<u64> {
    let count = replace_date(connection, table, logical_date, rows)
        .await
        .map_err(PipelineError::Database)?;
    Ok(count)
}

async fn replace_date(
    connection: &mut MySqlConnection,
    table: &str,
    logical_date: &str,
    rows: &[OutputRow],
) -> Result<u64, sqlx::Error> {
    let delete = delete_statement(table);
    let insert = insert_statement(table);

    let mut transaction = connection.begin().await?;

    sqlx::query(&delete)
        .bind(logical_date)
        .execute(&mut *transaction)
        .await?;

    for row in rows {
        let mut query = sqlx::query(&insert)
            .bind(&row.source_sheet)
            .bind(&row.load_date);
        for slot in &row.slots {
            query = query.bind(slot.as_deref());
        }
        query.execute(&mut *transaction).await?;
    }

    transaction.commit().await?;
    Ok(rows.len() as u64)
}

fn escape_table_name(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn delete_statement(table: &str) -> String {
    format!(
        "DELETE FROM {} WHERE load_date = ?",
        escape_table_name(table)
    )
}

fn insert_statement(table: &str) -> String {
    let columns = staging::header().join(",");
    let placeholders = vec!["?"; staging::header().len()].join(",");
    format!(
        "INSERT INTO {} ({columns}) VALUES({placeholders})",
        escape_table_name(table)
    )
}
