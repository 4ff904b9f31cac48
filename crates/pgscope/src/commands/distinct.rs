use crate::commands::parse_table_name;
use crate::output::{DistinctRunResult, OutputFormat, print_distinct};
use anyhow::{Context, Result};
use pgscope_core::distinct::DistinctCounter;
use pgscope_db::{ConnectionPool, JsonbSource};

/// run counts distinct value combinations at the given key paths
pub async fn run(
    database_url: &str,
    table: &str,
    column: &str,
    keys: Vec<String>,
    limit: u64,
    format: OutputFormat,
) -> Result<()> {
    let (schema, table) = parse_table_name(table);

    let conn = ConnectionPool::new(database_url)
        .await
        .context("Failed to create database connection pool")?;

    conn.test_connection()
        .await
        .context("Failed to connect to the database")?;

    let source = JsonbSource::new(&schema, &table, column);
    let documents = source
        .fetch(conn.pool(), if limit == 0 { None } else { Some(limit) })
        .await
        .context("Failed to fetch documents")?;

    if documents.is_empty() {
        anyhow::bail!("No documents found. Column may be empty or NULL.");
    }

    let mut counter = DistinctCounter::new(keys);
    for doc in &documents {
        counter.observe(doc);
    }

    let result = DistinctRunResult {
        table: table.to_string(),
        column: column.to_string(),
        docs_scanned: documents.len() as u64,
        keys: counter.keys().to_vec(),
        groups: counter.into_groups(),
    };
    print_distinct(&result, &format);

    Ok(())
}
