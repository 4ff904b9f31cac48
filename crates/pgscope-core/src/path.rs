use serde_json::Value;

/// A configured wildcard pattern, e.g. `name.$` or `$.city`.
///
/// A rule matches a candidate path only when the segment counts are equal
/// and every non-`$` segment compares equal. Matching candidates fold to
/// the rule's canonical string, so `name.first` and `name.last` both
/// aggregate under `name.$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardRule {
    canonical: String,
    segments: Vec<String>,
}

impl WildcardRule {
    pub fn new(pattern: &str) -> Self {
        Self {
            canonical: pattern.to_string(),
            segments: pattern.split('.').map(str::to_string).collect(),
        }
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Segment-count-exact match against an already split candidate.
    fn matches(&self, candidate: &[&str]) -> bool {
        self.segments.len() == candidate.len()
            && self
                .segments
                .iter()
                .zip(candidate)
                .all(|(rule_seg, cand_seg)| rule_seg == "$" || rule_seg == cand_seg)
    }
}

/// Join a parent path with a child segment, then fold the result through
/// the configured wildcard rules. First matching rule wins; rule order is
/// the configured order.
pub fn fold_child(parent: &str, key: &str, rules: &[WildcardRule]) -> String {
    let candidate = if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    };
    if rules.is_empty() {
        return candidate;
    }
    let segments: Vec<&str> = candidate.split('.').collect();
    for rule in rules {
        if rule.matches(&segments) {
            return rule.canonical.clone();
        }
    }
    candidate
}

/// The synthetic child path used when array indices collapse to one bucket.
pub fn array_child(parent: &str) -> String {
    if parent.is_empty() {
        "$".to_string()
    } else {
        format!("{}.$", parent)
    }
}

/// True when any segment of the path is the literal `$`, whether it came
/// from array folding or a matched wildcard rule.
pub fn has_wildcard_segment(path: &str) -> bool {
    path.split('.').any(|seg| seg == "$")
}

/// Fetch the value at a dot-delimited path, descending nested objects.
/// Returns None when any intermediate key is absent or not an object.
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
