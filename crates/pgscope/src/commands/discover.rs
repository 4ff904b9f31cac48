use crate::output::{OutputFormat, print_columns};
use anyhow::{Context, Result};
use pgscope_db::{ConnectionPool, discover_jsonb_columns};

/// run lists every JSONB column in the database, with row estimates
pub async fn run(database_url: &str, format: OutputFormat) -> Result<()> {
    let conn = ConnectionPool::new(database_url)
        .await
        .context("Failed to connect to the database")?;

    let columns = discover_jsonb_columns(conn.pool())
        .await
        .context("Failed to list JSONB columns")?;

    print_columns(&columns, &format);

    Ok(())
}
