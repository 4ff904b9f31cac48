use crate::commands::parse_table_name;
use crate::output::{OutputFormat, SchemaRunResult, print_schema};
use anyhow::{Context, Result};
use colored::Colorize;
use pgscope_core::{OutputTarget, SchemaOptions, analyze};
use pgscope_db::{ConnectionPool, JsonbSource, persist_report};
use std::collections::BTreeMap;

/// Translate CLI flags into engine options. Any --include mark switches
/// the filter into inclusion mode, which mirrors how a mixed fields map
/// behaves.
pub fn build_options(
    limit: u64,
    wildcards: Vec<String>,
    expand_arrays: bool,
    include: &[String],
    exclude: &[String],
    id_field: String,
    out: Option<String>,
) -> SchemaOptions {
    let mut fields: BTreeMap<String, i32> = BTreeMap::new();
    for path in exclude {
        fields.insert(path.clone(), -1);
    }
    for path in include {
        fields.insert(path.clone(), 1);
    }

    SchemaOptions {
        wildcards,
        arrays_are_wildcards: !expand_arrays,
        fields,
        limit: if limit == 0 { None } else { Some(limit) },
        out: match out {
            Some(name) => OutputTarget::Collection(name),
            None => OutputTarget::Inline,
        },
        id_field,
    }
}

/// run infers the schema of one jsonb column
pub async fn run(
    database_url: &str,
    table: &str,
    column: &str,
    options: SchemaOptions,
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
    let total = source
        .total(conn.pool())
        .await
        .context("Failed to count documents")?;

    if total == 0 {
        anyhow::bail!("No documents found. Column may be empty or NULL.");
    }

    let draw = match options.effective_limit() {
        Some(limit) => limit.min(total),
        None => total,
    };
    println!("\nProcessing {} of {} document(s)...", draw, total);

    let documents = source
        .fetch(conn.pool(), options.effective_limit())
        .await
        .context("Failed to fetch documents")?;

    let report = analyze(
        &options,
        documents.into_iter().map(Ok::<_, std::convert::Infallible>),
    )
    .context("Schema analysis failed")?;

    match &options.out {
        OutputTarget::Collection(destination) => {
            persist_report(conn.pool(), destination, &report)
                .await
                .context("Failed to persist report")?;
            println!(
                "{} {} path(s) into table '{}'",
                "Persisted".bold().green(),
                report.rows.len(),
                destination
            );
        }
        OutputTarget::Inline => {
            let result = SchemaRunResult {
                table: table.to_string(),
                column: column.to_string(),
                report,
            };
            print_schema(&result, &format);
        }
    }

    Ok(())
}
