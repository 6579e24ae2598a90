use std::collections::{BTreeMap, BTreeSet};

/// Attribute-like name some libraries declare as a class for reflection
/// compatibility; it must never be renamed.
pub const REFLECTION_SENTINEL: &str = "ReturnTypeWillChange";

/// Accumulator for everything found during one discovery run
///
/// Entries are only ever added. Filtering (sentinel removal, already-prefixed
/// names) happens in the query methods, so the raw inventory stays intact for
/// the lifetime of the store. Ordered collections keep every view
/// deterministic regardless of the order files were scanned in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryStore {
    namespaces: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    constants: BTreeSet<String>,
}

impl DiscoveryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `original -> replacement`; a later write for the same namespace wins
    pub fn record_namespace(&mut self, original: impl Into<String>, replacement: impl Into<String>) {
        self.namespaces.insert(original.into(), replacement.into());
    }

    pub fn record_class(&mut self, name: impl Into<String>) {
        self.classes.insert(name.into());
    }

    pub fn record_constant(&mut self, name: impl Into<String>) {
        self.constants.insert(name.into());
    }

    /// Replacement recorded for `namespace`, if any
    #[must_use]
    pub fn namespace_replacement(&self, namespace: &str) -> Option<&str> {
        self.namespaces.get(namespace).map(String::as_str)
    }

    #[must_use]
    pub fn contains_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    #[must_use]
    pub fn contains_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty() && self.classes.is_empty() && self.constants.is_empty()
    }

    /// Namespace replacements, shortest original first.
    ///
    /// When `current_prefix` is non-empty, keys that already start with it
    /// (followed by a namespace separator) have it stripped, so a re-run over
    /// already-prefixed output reports the original names again. This is a
    /// best-effort heuristic: replacements produced by custom rules are not
    /// inverted. If two keys strip to the same name, the lexicographically
    /// later key wins.
    #[must_use]
    pub fn discovered_namespaces(&self, current_prefix: &str) -> Vec<(String, String)> {
        let mut unprefixed: BTreeMap<&str, &str> = BTreeMap::new();
        for (original, replacement) in &self.namespaces {
            unprefixed.insert(strip_namespace_prefix(original, current_prefix), replacement);
        }

        let mut pairs: Vec<(String, String)> = unprefixed
            .into_iter()
            .map(|(original, replacement)| (original.to_string(), replacement.to_string()))
            .collect();
        // Stable sort: equal lengths keep lexicographic order from the map.
        pairs.sort_by_key(|(original, _)| original.len());
        pairs
    }

    /// Class names to rename, without the reflection sentinel and without
    /// names already carrying `current_class_prefix`
    #[must_use]
    pub fn discovered_classes(&self, current_class_prefix: &str) -> Vec<String> {
        self.classes
            .iter()
            .filter(|name| name.as_str() != REFLECTION_SENTINEL)
            .filter(|name| !has_prefix(name, current_class_prefix))
            .cloned()
            .collect()
    }

    /// Constant names to rename, without names already carrying `current_constant_prefix`
    #[must_use]
    pub fn discovered_constants(&self, current_constant_prefix: &str) -> Vec<String> {
        self.constants
            .iter()
            .filter(|name| !has_prefix(name, current_constant_prefix))
            .cloned()
            .collect()
    }

    /// Counts of recorded namespaces, classes and constants
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.namespaces.len(), self.classes.len(), self.constants.len())
    }
}

fn has_prefix(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.starts_with(prefix)
}

fn strip_namespace_prefix<'a>(namespace: &'a str, prefix: &str) -> &'a str {
    let prefix = prefix.trim_end_matches('\\');
    if prefix.is_empty() {
        return namespace;
    }
    match namespace.strip_prefix(prefix) {
        Some(rest) if rest.starts_with('\\') => rest.trim_start_matches('\\'),
        _ => namespace,
    }
}
