use crate::path::lookup;
use serde_json::Value;
use std::collections::HashMap;

/// One distinct combination of key values and how many documents had it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DistinctGroup {
    pub values: Vec<Option<Value>>,
    pub count: u64,
}

/// Group-by-value counter over one or more dot-delimited key paths.
///
/// The same merge-by-key shape as the schema aggregation: counts sum per
/// group, so partials built from any partitioning combine to the same
/// counts. Group order is first-seen, which follows the left operand when
/// merging.
#[derive(Debug, Clone)]
pub struct DistinctCounter {
    keys: Vec<String>,
    order: Vec<String>,
    groups: HashMap<String, DistinctGroup>,
}

/// Build the lookup key for one value tuple. Cannot fail: `Value`'s text
/// form is infallible, and JSON escapes control characters, so the NUL
/// separator never appears inside a serialized value. A missing value gets
/// a bare separator, distinct from every present value including null.
fn group_key(values: &[Option<Value>]) -> String {
    let mut key = String::new();
    for value in values {
        key.push('\0');
        if let Some(value) = value {
            key.push('=');
            key.push_str(&value.to_string());
        }
    }
    key
}

impl DistinctCounter {
    pub fn new<S: Into<String>>(keys: Vec<S>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            order: Vec::new(),
            groups: HashMap::new(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Count one document. Documents where every key is missing are
    /// skipped; a present-but-null value still counts as a value.
    pub fn observe(&mut self, doc: &Value) {
        let values: Vec<Option<Value>> = self
            .keys
            .iter()
            .map(|key| lookup(doc, key).cloned())
            .collect();
        if values.iter().all(Option::is_none) {
            return;
        }

        let group_key = group_key(&values);
        if let Some(group) = self.groups.get_mut(&group_key) {
            group.count += 1;
        } else {
            self.order.push(group_key.clone());
            self.groups.insert(group_key, DistinctGroup { values, count: 1 });
        }
    }

    /// Merge another counter built over the same keys.
    pub fn merge(&mut self, other: DistinctCounter) {
        for group_key in other.order {
            let group = &other.groups[&group_key];
            if let Some(existing) = self.groups.get_mut(&group_key) {
                existing.count += group.count;
            } else {
                self.order.push(group_key.clone());
                self.groups.insert(group_key, group.clone());
            }
        }
    }

    /// Groups in first-seen order.
    pub fn into_groups(self) -> Vec<DistinctGroup> {
        let mut groups = self.groups;
        self.order
            .iter()
            .filter_map(|key| groups.remove(key))
            .collect()
    }
}
