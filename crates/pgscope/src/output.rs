use clap::ValueEnum;
use colored::Colorize;
use pgscope_core::SchemaReport;
use pgscope_core::distinct::DistinctGroup;
use pgscope_db::JsonbColumn;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

#[derive(Tabled)]
pub struct ColumnRow {
    #[tabled(rename = "Schema")]
    pub schema: String,
    #[tabled(rename = "Table")]
    pub table: String,
    #[tabled(rename = "Column")]
    pub column: String,
    #[tabled(rename = "Est. Rows")]
    pub row_count: String,
}

impl From<JsonbColumn> for ColumnRow {
    fn from(col: JsonbColumn) -> Self {
        Self {
            schema: col.schema,
            table: col.table,
            column: col.column,
            row_count: col
                .estimated_rows
                .map_or("N/A".to_string(), |c| c.to_string()),
        }
    }
}

pub fn print_columns(columns: &[JsonbColumn], format: &OutputFormat) {
    match format {
        OutputFormat::Table => {
            if columns.is_empty() {
                println!("{}", "No JSONB columns found.".yellow());
                return;
            }

            let rows: Vec<ColumnRow> = columns.iter().map(|c| c.clone().into()).collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());

            println!("\n{}", "JSONB Columns:".bold().green());
            println!("{}", table);
            println!("\nFound {} JSONB column(s)\n", columns.len());
        }
        OutputFormat::Json => {
            let output = json!({
                "columns": columns,
                "count": columns.len()
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        OutputFormat::Markdown => {
            println!("# JSONB Columns\n");
            println!("| Schema | Table | Column | Est. Rows |");
            println!("|--------|-------|--------|-----------|");
            for col in columns {
                println!(
                    "| {} | {} | {} | {} |",
                    col.schema,
                    col.table,
                    col.column,
                    col.estimated_rows
                        .map_or("N/A".to_string(), |c| c.to_string())
                );
            }
            println!("\nFound {} JSONB column(s)\n", columns.len());
        }
    }
}

pub struct SchemaRunResult {
    pub table: String,
    pub column: String,
    pub report: SchemaReport,
}

#[derive(Tabled)]
struct SchemaLine {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "Docs")]
    docs: u64,
    #[tabled(rename = "Coverage %")]
    coverage: String,
    #[tabled(rename = "Per Doc")]
    per_doc: String,
}

pub fn print_schema(result: &SchemaRunResult, format: &OutputFormat) {
    match format {
        OutputFormat::Table => print_schema_table(result),
        OutputFormat::Json => print_schema_json(result),
        OutputFormat::Markdown => print_schema_markdown(result),
    }
}

fn print_schema_json(result: &SchemaRunResult) {
    let drifting: Vec<&str> = result
        .report
        .rows
        .iter()
        .filter(|r| r.types.len() > 1)
        .map(|r| r.path.as_str())
        .collect();
    let output = json!({
        "table": result.table,
        "column": result.column,
        "docs_sampled": result.report.docs_sampled,
        "rows": result.report.rows,
        "summary": {
            "total_paths": result.report.rows.len(),
            "wildcard_paths": result.report.rows.iter().filter(|r| r.wildcard).count(),
            "multi_type_paths": drifting,
        }
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn print_schema_markdown(result: &SchemaRunResult) {
    println!("# Schema: {}.{}\n", result.table, result.column);
    println!("**Documents sampled:** {}\n", result.report.docs_sampled);
    println!("| Path | Type | Docs | Coverage % | Per Doc |");
    println!("|------|------|------|------------|---------|");
    for row in &result.report.rows {
        for line in &row.results {
            println!(
                "| {} | {} | {} | {:.1} | {:.2} |",
                row.path, line.type_name, line.docs, line.coverage, line.per_doc
            );
        }
    }
    println!("\n{} path(s)\n", result.report.rows.len());
}

fn print_schema_table(result: &SchemaRunResult) {
    println!(
        "\n{} {}.{} ({} documents sampled)\n",
        "Schema of".bold().green(),
        result.table,
        result.column,
        result.report.docs_sampled
    );

    let multi_type = result
        .report
        .rows
        .iter()
        .filter(|r| r.types.len() > 1)
        .count();
    println!("{}", "Summary:".bold());
    println!("  Total paths: {}", result.report.rows.len());
    if multi_type > 0 {
        println!(
            "  Paths with more than one type: {}",
            multi_type.to_string().red()
        );
    } else {
        println!("  {}", "Every path has a single type".green());
    }

    let lines: Vec<SchemaLine> = result
        .report
        .rows
        .iter()
        .flat_map(|row| {
            row.results.iter().map(|line| SchemaLine {
                path: row.path.clone(),
                type_name: line.type_name.clone(),
                docs: line.docs,
                coverage: format!("{:.1}", line.coverage),
                per_doc: format!("{:.2}", line.per_doc),
            })
        })
        .collect();

    let mut table = Table::new(lines);
    table.with(Style::rounded());
    println!("{}", table);
    println!();
}

pub struct DistinctRunResult {
    pub table: String,
    pub column: String,
    pub docs_scanned: u64,
    pub keys: Vec<String>,
    pub groups: Vec<DistinctGroup>,
}

#[derive(Tabled)]
struct DistinctLine {
    #[tabled(rename = "Values")]
    values: String,
    #[tabled(rename = "Count")]
    count: u64,
}

fn render_values(group: &DistinctGroup) -> String {
    group
        .values
        .iter()
        .map(|v| match v {
            Some(value) => value.to_string(),
            None => "<missing>".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_distinct(result: &DistinctRunResult, format: &OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!(
                "\n{} {} in {}.{} ({} document(s) scanned)\n",
                "Distinct values of".bold().green(),
                result.keys.join(", "),
                result.table,
                result.column,
                result.docs_scanned
            );
            let lines: Vec<DistinctLine> = result
                .groups
                .iter()
                .map(|g| DistinctLine {
                    values: render_values(g),
                    count: g.count,
                })
                .collect();
            let mut table = Table::new(lines);
            table.with(Style::rounded());
            println!("{}", table);
            println!("\n{} distinct combination(s)\n", result.groups.len());
        }
        OutputFormat::Json => {
            let output = json!({
                "table": result.table,
                "column": result.column,
                "docs_scanned": result.docs_scanned,
                "keys": result.keys,
                "groups": result.groups,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        OutputFormat::Markdown => {
            println!("# Distinct: {} in {}.{}\n", result.keys.join(", "), result.table, result.column);
            println!("| Values | Count |");
            println!("|--------|-------|");
            for group in &result.groups {
                println!("| {} | {} |", render_values(group), group.count);
            }
            println!("\n{} distinct combination(s)\n", result.groups.len());
        }
    }
}
