use crate::filter::FieldFilter;
use crate::path::{self, WildcardRule};
use crate::stats::PathStats;
use crate::types::TypeTag;
use serde_json::Value;
use std::collections::BTreeMap;

/// Resolved traversal settings shared by every document in a run.
#[derive(Debug, Clone)]
pub struct WalkConfig {
    pub wildcards: Vec<WildcardRule>,
    pub arrays_are_wildcards: bool,
    pub id_field: String,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            wildcards: Vec::new(),
            arrays_are_wildcards: true,
            id_field: "_id".to_string(),
        }
    }
}

/// Enumerate every (path, type) observation in one document.
///
/// Pure per document: re-enumerating yields the same sequence. Container
/// nodes emit an observation for themselves after their children; the
/// document root itself is never emitted.
pub fn enumerate(doc: &Value, config: &WalkConfig) -> Vec<(String, TypeTag)> {
    let mut observations = Vec::new();
    walk(doc, "", config, &mut observations);
    observations
}

fn walk(value: &Value, path: &str, config: &WalkConfig, out: &mut Vec<(String, TypeTag)>) {
    let tag = TypeTag::of(value);
    if tag.is_container() {
        match value {
            Value::Object(map) => {
                for (key, child_value) in map {
                    // The primary identifier is opaque: emit its path at
                    // the root without descending into its structure
                    if path.is_empty() && *key == config.id_field {
                        out.push((key.clone(), TypeTag::of(child_value)));
                        continue;
                    }
                    let child_path = path::fold_child(path, key, &config.wildcards);
                    walk(child_value, &child_path, config, out);
                }
            }
            Value::Array(items) => {
                if config.arrays_are_wildcards {
                    // Every index collapses into one `$` bucket
                    let child_path = path::array_child(path);
                    for item in items {
                        walk(item, &child_path, config, out);
                    }
                } else {
                    for (index, item) in items.iter().enumerate() {
                        let child_path =
                            path::fold_child(path, &index.to_string(), &config.wildcards);
                        walk(item, &child_path, config, out);
                    }
                }
            }
            _ => {}
        }
    }
    if !path.is_empty() {
        out.push((path.to_string(), tag));
    }
}

/// The map step: one document in, per-path local stats out.
///
/// Touches no shared state, which is what lets any number of workers run
/// it concurrently and merge the partials afterwards.
pub fn accumulate(
    doc: &Value,
    config: &WalkConfig,
    filter: &FieldFilter,
) -> BTreeMap<String, PathStats> {
    let mut local: BTreeMap<String, PathStats> = BTreeMap::new();
    for (path, tag) in enumerate(doc, config) {
        if filter.retain(&path) {
            local.entry(path).or_default().observe(tag);
        }
    }
    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::TypeStat;
    use serde_json::json;

    fn paths_of(observations: &[(String, TypeTag)]) -> Vec<&str> {
        observations.iter().map(|(p, _)| p.as_str()).collect()
    }

    #[test]
    fn test_flat_document() {
        let doc = json!({"name": "Ada", "age": 36});
        let mut obs = enumerate(&doc, &WalkConfig::default());
        obs.sort();
        assert_eq!(
            obs,
            vec![
                ("age".to_string(), TypeTag::Int),
                ("name".to_string(), TypeTag::String),
            ]
        );
    }

    #[test]
    fn test_nested_document_emits_container_nodes() {
        let doc = json!({"user": {"email": "a@b.c"}});
        let obs = enumerate(&doc, &WalkConfig::default());
        // Children come before their container
        assert_eq!(
            obs,
            vec![
                ("user.email".to_string(), TypeTag::String),
                ("user".to_string(), TypeTag::Object),
            ]
        );
    }

    #[test]
    fn test_root_is_never_emitted() {
        let doc = json!({"a": 1});
        let obs = enumerate(&doc, &WalkConfig::default());
        assert!(obs.iter().all(|(p, _)| !p.is_empty()));
    }

    #[test]
    fn test_array_indices_fold_by_default() {
        let doc = json!({"tags": [1, 2, 3]});
        let obs = enumerate(&doc, &WalkConfig::default());
        assert_eq!(
            obs,
            vec![
                ("tags.$".to_string(), TypeTag::Int),
                ("tags.$".to_string(), TypeTag::Int),
                ("tags.$".to_string(), TypeTag::Int),
                ("tags".to_string(), TypeTag::Array),
            ]
        );
    }

    #[test]
    fn test_array_indices_expand_when_disabled() {
        let doc = json!({"tags": [1, 2, 3]});
        let config = WalkConfig {
            arrays_are_wildcards: false,
            ..WalkConfig::default()
        };
        let obs = enumerate(&doc, &config);
        assert_eq!(
            paths_of(&obs),
            vec!["tags.0", "tags.1", "tags.2", "tags"]
        );
    }

    #[test]
    fn test_expanded_indices_still_fold_through_rules() {
        let doc = json!({"tags": [1, 2]});
        let config = WalkConfig {
            arrays_are_wildcards: false,
            wildcards: vec![WildcardRule::new("tags.$")],
            ..WalkConfig::default()
        };
        let obs = enumerate(&doc, &config);
        assert_eq!(paths_of(&obs), vec!["tags.$", "tags.$", "tags"]);
    }

    #[test]
    fn test_wildcard_rule_folds_object_fields() {
        let doc = json!({"name": {"first": "Ada", "last": "Lovelace"}});
        let config = WalkConfig {
            wildcards: vec![WildcardRule::new("name.$")],
            ..WalkConfig::default()
        };
        let obs = enumerate(&doc, &config);
        assert_eq!(paths_of(&obs), vec!["name.$", "name.$", "name"]);
    }

    #[test]
    fn test_id_field_is_opaque_at_root() {
        let doc = json!({"_id": {"$oid": "507f1f77bcf86cd799439011"}, "v": 1});
        let obs = enumerate(&doc, &WalkConfig::default());
        assert_eq!(
            obs,
            vec![
                ("_id".to_string(), TypeTag::ObjectId),
                ("v".to_string(), TypeTag::Int),
            ]
        );
    }

    #[test]
    fn test_id_field_recurses_below_root() {
        // Only the direct root child is special
        let doc = json!({"ref": {"_id": {"n": 1}}});
        let mut obs = enumerate(&doc, &WalkConfig::default());
        obs.sort();
        assert_eq!(
            obs,
            vec![
                ("ref".to_string(), TypeTag::Object),
                ("ref._id".to_string(), TypeTag::Object),
                ("ref._id.n".to_string(), TypeTag::Int),
            ]
        );
    }

    #[test]
    fn test_enumeration_is_idempotent() {
        let doc = json!({"a": [1, {"b": "x"}], "c": {"d": [true, null]}});
        let config = WalkConfig::default();
        assert_eq!(enumerate(&doc, &config), enumerate(&doc, &config));
    }

    #[test]
    fn test_empty_array_emits_only_itself() {
        let doc = json!({"items": []});
        let obs = enumerate(&doc, &WalkConfig::default());
        assert_eq!(obs, vec![("items".to_string(), TypeTag::Array)]);
    }

    #[test]
    fn test_accumulate_counts_repeats_within_document() {
        let doc = json!({"tags": [1, 2, 3]});
        let local = accumulate(&doc, &WalkConfig::default(), &FieldFilter::All);
        assert_eq!(
            local["tags.$"].types[&TypeTag::Int],
            TypeStat { docs: 1, occurrences: 3 }
        );
        assert_eq!(
            local["tags"].types[&TypeTag::Array],
            TypeStat { docs: 1, occurrences: 1 }
        );
    }

    #[test]
    fn test_accumulate_applies_filter_to_emission_only() {
        let doc = json!({"a": 1, "b": {"c": 2}});
        let marks = [("b.c".to_string(), 1)].into_iter().collect();
        let filter = FieldFilter::from_marks(&marks);
        let local = accumulate(&doc, &WalkConfig::default(), &filter);
        // b.c is below the filtered-out b, but recursion still reached it
        assert_eq!(local.len(), 1);
        assert!(local.contains_key("b.c"));
    }

    #[test]
    fn test_accumulate_mixed_types_in_one_document() {
        let doc = json!({"v": [1, "x", 2]});
        let local = accumulate(&doc, &WalkConfig::default(), &FieldFilter::All);
        let stats = &local["v.$"];
        assert_eq!(stats.types[&TypeTag::Int], TypeStat { docs: 1, occurrences: 2 });
        assert_eq!(
            stats.types[&TypeTag::String],
            TypeStat { docs: 1, occurrences: 1 }
        );
    }
}
