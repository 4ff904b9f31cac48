use std::collections::BTreeMap;
use std::collections::HashSet;

/// Inclusion/exclusion policy over enumerated paths.
///
/// The two modes are mutually exclusive per run: as soon as any configured
/// field is marked include (1), the filter runs in inclusion mode and
/// exclusion marks are ignored. Only when no field is marked include does
/// exclusion mode activate. Filtering gates emission, never recursion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    All,
    Include(HashSet<String>),
    Exclude(HashSet<String>),
}

impl FieldFilter {
    /// Build from a `path -> 1 / -1` map as configured by the caller.
    pub fn from_marks(fields: &BTreeMap<String, i32>) -> Self {
        let included: HashSet<String> = fields
            .iter()
            .filter(|(_, mark)| **mark == 1)
            .map(|(path, _)| path.clone())
            .collect();
        if !included.is_empty() {
            return FieldFilter::Include(included);
        }
        let excluded: HashSet<String> = fields
            .iter()
            .filter(|(_, mark)| **mark == -1)
            .map(|(path, _)| path.clone())
            .collect();
        if excluded.is_empty() {
            FieldFilter::All
        } else {
            FieldFilter::Exclude(excluded)
        }
    }

    /// Should an observation at this (already folded) path be kept?
    pub fn retain(&self, path: &str) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Include(paths) => paths.contains(path),
            FieldFilter::Exclude(paths) => !paths.contains(path),
        }
    }
}

impl Default for FieldFilter {
    fn default() -> Self {
        FieldFilter::All
    }
}
