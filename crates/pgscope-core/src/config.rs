use crate::filter::FieldFilter;
use crate::path::WildcardRule;
use crate::walker::WalkConfig;
use serde_json::Value;
use std::collections::BTreeMap;

/// Where the finalized rows should go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Hand the report back to the caller in memory.
    #[default]
    Inline,
    /// Suggest persisting into this named destination; the sink
    /// collaborator decides the storage format.
    Collection(String),
}

/// Run configuration for the schema orchestrator.
///
/// These are advisory tuning knobs: when resolved from a loose JSON object
/// via [`SchemaOptions::from_json`], a wrong-shaped option silently falls
/// back to its default instead of aborting the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaOptions {
    /// Ordered wildcard patterns; order decides which rule folds first.
    pub wildcards: Vec<String>,
    /// Collapse array indices into a single `$` bucket.
    pub arrays_are_wildcards: bool,
    /// Exact-path marks: 1 = include, -1 = exclude.
    pub fields: BTreeMap<String, i32>,
    /// Sample at most this many documents; `None` or 0 means all.
    pub limit: Option<u64>,
    pub out: OutputTarget,
    /// Root field treated as an opaque identifier.
    pub id_field: String,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            wildcards: Vec::new(),
            arrays_are_wildcards: true,
            fields: BTreeMap::new(),
            limit: None,
            out: OutputTarget::Inline,
            id_field: "_id".to_string(),
        }
    }
}

impl SchemaOptions {
    /// Resolve options from a loose JSON object, e.g.
    /// `{"wildcards": ["name.$"], "limit": 100, "fields": {"a": 1}}`.
    /// Unknown keys are ignored; mistyped values keep their defaults.
    pub fn from_json(raw: &Value) -> Self {
        let mut options = Self::default();
        let Some(map) = raw.as_object() else {
            return options;
        };

        if let Some(Value::Array(patterns)) = map.get("wildcards") {
            options.wildcards = patterns
                .iter()
                .filter_map(|p| p.as_str().map(str::to_string))
                .collect();
        }
        if let Some(Value::Bool(flag)) = map.get("arraysAreWildcards") {
            options.arrays_are_wildcards = *flag;
        }
        if let Some(Value::Object(fields)) = map.get("fields") {
            for (path, mark) in fields {
                // 1 or true marks include, anything else present excludes
                let value = match mark {
                    Value::Bool(true) => 1,
                    Value::Number(n) if n.as_i64() == Some(1) => 1,
                    _ => -1,
                };
                options.fields.insert(path.clone(), value);
            }
        }
        if let Some(Value::Number(n)) = map.get("limit") {
            options.limit = match n.as_i64() {
                Some(limit) if limit > 0 => Some(limit as u64),
                _ => None,
            };
        }
        if let Some(Value::String(name)) = map.get("out") {
            options.out = OutputTarget::Collection(name.clone());
        }
        if let Some(Value::String(field)) = map.get("idField") {
            options.id_field = field.clone();
        }
        options
    }

    /// Effective sample cap: `None` means draw everything.
    pub fn effective_limit(&self) -> Option<u64> {
        match self.limit {
            Some(0) | None => None,
            Some(n) => Some(n),
        }
    }

    pub(crate) fn walk_config(&self) -> WalkConfig {
        WalkConfig {
            wildcards: self.wildcards.iter().map(|p| WildcardRule::new(p)).collect(),
            arrays_are_wildcards: self.arrays_are_wildcards,
            id_field: self.id_field.clone(),
        }
    }

    pub(crate) fn field_filter(&self) -> FieldFilter {
        FieldFilter::from_marks(&self.fields)
    }
}
