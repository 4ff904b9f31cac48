use crate::path::has_wildcard_segment;
use crate::stats::{Aggregation, PathStats, TypeStat};
use crate::types::TypeTag;
use serde::Serialize;

/// One per-type line inside a [`ResultRow`]. The synthetic summary line
/// carries the type name `all`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeBreakdown {
    #[serde(rename = "type")]
    pub type_name: String,
    pub docs: u64,
    pub coverage: f64,
    pub per_doc: f64,
}

/// Finalized output for one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub path: String,
    pub wildcard: bool,
    pub types: Vec<TypeTag>,
    pub results: Vec<TypeBreakdown>,
}

/// The terminal artifact of a run: every path finalized against the
/// number of documents actually sampled.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub docs_sampled: u64,
    pub rows: Vec<ResultRow>,
}

fn breakdown(type_name: &str, stat: TypeStat, total: u64) -> TypeBreakdown {
    let coverage = if total == 0 {
        0.0
    } else {
        stat.docs as f64 / total as f64 * 100.0
    };
    let per_doc = if stat.docs == 0 {
        0.0
    } else {
        stat.occurrences as f64 / stat.docs as f64
    };
    TypeBreakdown {
        type_name: type_name.to_string(),
        docs: stat.docs,
        coverage,
        per_doc,
    }
}

/// Turn merged stats for one path into an output row.
///
/// The `all` line sums the per-type doc counts without deduplication, so a
/// document observed under two types at the same path counts twice. That
/// matches the source semantics of "total field presence events" and is
/// kept as-is.
pub fn finalize(path: &str, stats: &PathStats, total: u64) -> ResultRow {
    let mut all = TypeStat::default();
    for stat in stats.types.values() {
        all.add(*stat);
    }

    let mut results = vec![breakdown("all", all, total)];
    let mut types = Vec::with_capacity(stats.types.len());
    for (tag, stat) in &stats.types {
        types.push(*tag);
        results.push(breakdown(tag.name(), *stat, total));
    }

    ResultRow {
        path: path.to_string(),
        wildcard: has_wildcard_segment(path),
        types,
        results,
    }
}

/// Finalize every path of a merged aggregation. Rows come out in path
/// order; ordering is presentational, not a correctness property.
pub fn finalize_all(aggregation: &Aggregation) -> SchemaReport {
    let rows = aggregation
        .paths
        .iter()
        .map(|(path, stats)| finalize(path, stats, aggregation.docs_sampled))
        .collect();
    SchemaReport {
        docs_sampled: aggregation.docs_sampled,
        rows,
    }
}
