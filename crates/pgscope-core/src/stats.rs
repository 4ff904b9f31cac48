use crate::types::TypeTag;
use serde::Serialize;
use std::collections::BTreeMap;

/// Accumulator for one (path, type) pair.
///
/// `docs` counts distinct contributing documents; `occurrences` counts
/// every sighting, so `occurrences >= docs` whenever `docs > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeStat {
    pub docs: u64,
    pub occurrences: u64,
}

impl TypeStat {
    pub fn add(&mut self, other: TypeStat) {
        self.docs += other.docs;
        self.occurrences += other.occurrences;
    }
}

/// Per-type stats for one path. Never holds an entry with zero docs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathStats {
    pub types: BTreeMap<TypeTag, TypeStat>,
}

impl PathStats {
    /// Record one observation during the map step. The first sighting of a
    /// type within the current document creates the entry with docs = 1;
    /// repeats in the same document only bump occurrences.
    pub fn observe(&mut self, tag: TypeTag) {
        let stat = self.types.entry(tag).or_insert(TypeStat {
            docs: 1,
            occurrences: 0,
        });
        stat.occurrences += 1;
    }

    /// Combine two per-path stats: shared types sum field-wise, types
    /// present on one side only carry through.
    pub fn merge(&mut self, other: PathStats) {
        for (tag, stat) in other.types {
            self.types.entry(tag).or_default().add(stat);
        }
    }
}

/// The running (or partial) aggregation over a set of documents.
///
/// `merge` is commutative and associative, so partials built from any
/// partitioning of the document set combine to the same result in any
/// order or tree shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub paths: BTreeMap<String, PathStats>,
    pub docs_sampled: u64,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document's local stats (the map step output) in.
    pub fn absorb_local(&mut self, local: BTreeMap<String, PathStats>) {
        self.docs_sampled += 1;
        for (path, stats) in local {
            self.paths.entry(path).or_default().merge(stats);
        }
    }

    /// Key-wise merge of another partial aggregation.
    pub fn merge(&mut self, other: Aggregation) {
        self.docs_sampled += other.docs_sampled;
        for (path, stats) in other.paths {
            self.paths.entry(path).or_default().merge(stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(entries: &[(TypeTag, u64, u64)]) -> PathStats {
        let mut stats = PathStats::default();
        for (tag, docs, occurrences) in entries {
            stats.types.insert(
                *tag,
                TypeStat {
                    docs: *docs,
                    occurrences: *occurrences,
                },
            );
        }
        stats
    }

    #[test]
    fn test_observe_counts_occurrences_not_docs() {
        let mut stats = PathStats::default();
        stats.observe(TypeTag::Int);
        stats.observe(TypeTag::Int);
        stats.observe(TypeTag::Int);
        let stat = stats.types[&TypeTag::Int];
        assert_eq!(stat.docs, 1);
        assert_eq!(stat.occurrences, 3);
    }

    #[test]
    fn test_observe_keeps_coexisting_types() {
        // Two types at the same path within one document must both survive
        let mut stats = PathStats::default();
        stats.observe(TypeTag::Int);
        stats.observe(TypeTag::String);
        assert_eq!(stats.types.len(), 2);
        assert_eq!(stats.types[&TypeTag::Int].docs, 1);
        assert_eq!(stats.types[&TypeTag::String].docs, 1);
    }

    #[test]
    fn test_merge_sums_shared_types() {
        let mut a = stats_with(&[(TypeTag::Int, 2, 5)]);
        let b = stats_with(&[(TypeTag::Int, 1, 3), (TypeTag::String, 1, 1)]);
        a.merge(b);
        assert_eq!(a.types[&TypeTag::Int], TypeStat { docs: 3, occurrences: 8 });
        assert_eq!(
            a.types[&TypeTag::String],
            TypeStat { docs: 1, occurrences: 1 }
        );
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = stats_with(&[(TypeTag::Int, 2, 5), (TypeTag::Double, 1, 1)]);
        let b = stats_with(&[(TypeTag::Int, 1, 3), (TypeTag::String, 4, 9)]);

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_aggregation_merge_sums_totals_and_paths() {
        let mut left = Aggregation::new();
        left.docs_sampled = 3;
        left.paths
            .insert("a".to_string(), stats_with(&[(TypeTag::Int, 2, 2)]));

        let mut right = Aggregation::new();
        right.docs_sampled = 2;
        right
            .paths
            .insert("a".to_string(), stats_with(&[(TypeTag::String, 1, 1)]));
        right
            .paths
            .insert("b".to_string(), stats_with(&[(TypeTag::Boolean, 2, 2)]));

        left.merge(right);
        assert_eq!(left.docs_sampled, 5);
        assert_eq!(left.paths["a"].types.len(), 2);
        assert_eq!(left.paths["b"].types[&TypeTag::Boolean].docs, 2);
    }

    #[test]
    fn test_aggregation_merge_is_associative() {
        let mut parts = Vec::new();
        for i in 0..3u64 {
            let mut agg = Aggregation::new();
            agg.docs_sampled = i + 1;
            agg.paths.insert(
                "x".to_string(),
                stats_with(&[(TypeTag::Int, i + 1, (i + 1) * 2)]),
            );
            parts.push(agg);
        }

        // (a + b) + c
        let mut left = parts[0].clone();
        left.merge(parts[1].clone());
        left.merge(parts[2].clone());

        // a + (b + c)
        let mut tail = parts[1].clone();
        tail.merge(parts[2].clone());
        let mut right = parts[0].clone();
        right.merge(tail);

        assert_eq!(left, right);
    }
}
