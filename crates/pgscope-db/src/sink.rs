use crate::catalog::quote_identifier;
use pgscope_core::SchemaReport;
use serde_json::Value;
use sqlx::PgPool;

/// Suggested destination table for a persisted report.
pub fn default_destination(table: &str) -> String {
    format!("{}_schema", table)
}

/// Serialize every row up front so persistence hits no encode errors once
/// it has started writing.
fn encode_rows(report: &SchemaReport) -> Result<Vec<(String, Value)>, sqlx::Error> {
    report
        .rows
        .iter()
        .map(|row| {
            let json = serde_json::to_value(row).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            Ok((row.path.clone(), json))
        })
        .collect()
}

/// Persist a finalized report into a named destination table, one row per
/// path with the full breakdown as jsonb. The destination is replaced, not
/// appended to, and the replacement happens in one transaction: on any
/// failure the previous report stays intact and the error is reported
/// back. Aggregation work already performed is never redone here.
pub async fn persist_report(
    pool: &PgPool,
    destination: &str,
    report: &SchemaReport,
) -> Result<(), sqlx::Error> {
    let rows = encode_rows(report)?;
    let destination = quote_identifier(destination);

    let mut tx = pool.begin().await?;

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {} (path text PRIMARY KEY, report jsonb NOT NULL)",
        destination
    ))
    .execute(&mut *tx)
    .await?;

    sqlx::query(&format!("DELETE FROM {}", destination))
        .execute(&mut *tx)
        .await?;

    for (path, report_json) in rows {
        sqlx::query(&format!(
            "INSERT INTO {} (path, report) VALUES ($1, $2)",
            destination
        ))
        .bind(path)
        .bind(report_json)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgscope_core::finalize::TypeBreakdown;
    use pgscope_core::{ResultRow, TypeTag};
    use serde_json::json;

    #[test]
    fn test_default_destination() {
        assert_eq!(default_destination("users"), "users_schema");
        assert_eq!(default_destination("order_items"), "order_items_schema");
    }

    #[test]
    fn test_encode_rows_keys_by_path() {
        let report = SchemaReport {
            docs_sampled: 2,
            rows: vec![
                ResultRow {
                    path: "a".to_string(),
                    wildcard: false,
                    types: vec![TypeTag::Int],
                    results: vec![TypeBreakdown {
                        type_name: "all".to_string(),
                        docs: 2,
                        coverage: 100.0,
                        per_doc: 1.0,
                    }],
                },
                ResultRow {
                    path: "b.$".to_string(),
                    wildcard: true,
                    types: vec![],
                    results: vec![],
                },
            ],
        };

        let rows = encode_rows(&report).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "a");
        assert_eq!(rows[0].1["results"][0]["type"], json!("all"));
        assert_eq!(rows[1].0, "b.$");
        assert_eq!(rows[1].1["wildcard"], json!(true));
    }
}
