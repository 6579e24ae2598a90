use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One file of a bundled package, as supplied by the file enumerator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Owning package name (e.g. `psr/log`)
    pub package_name: String,

    /// Where the file originally came from
    pub source_absolute_path: PathBuf,

    /// Path of the copied file, relative to the target directory
    pub target_relative_path: String,
}

impl FileRecord {
    #[must_use]
    pub fn new(
        package_name: impl Into<String>,
        source_absolute_path: impl Into<PathBuf>,
        target_relative_path: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            source_absolute_path: source_absolute_path.into(),
            target_relative_path: target_relative_path.into(),
        }
    }
}

/// Files to scan, keyed by path relative to the target directory.
///
/// Iteration, and therefore scan order, is sorted by relative path whatever
/// order the records were supplied in. Discovery is additive, so the order
/// never changes the results.
pub type FileManifest = BTreeMap<String, FileRecord>;

/// How a file arranges its namespaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileLayout {
    /// No namespace declaration; everything lives in the global namespace
    Global,
    /// Exactly one `namespace X;` statement covering the whole file
    SingleNamespace(String),
    /// Braced namespace blocks, or several namespace statements
    Blocks(usize),
}

impl FileLayout {
    /// Get human-readable name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::SingleNamespace(_) => "single-namespace",
            Self::Blocks(_) => "blocks",
        }
    }
}

/// Declarations extracted from one file, in source order without duplicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDeclarations {
    pub layout: FileLayout,
    pub namespaces: Vec<String>,
    pub classes: Vec<String>,
    pub constants: Vec<String>,
}

impl Default for FileDeclarations {
    fn default() -> Self {
        Self {
            layout: FileLayout::Global,
            namespaces: Vec::new(),
            classes: Vec::new(),
            constants: Vec::new(),
        }
    }
}

impl FileDeclarations {
    /// Check whether nothing renameable was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty() && self.classes.is_empty() && self.constants.is_empty()
    }

    pub(crate) fn push_namespace(&mut self, name: &str) {
        push_unique(&mut self.namespaces, name);
    }

    pub(crate) fn push_class(&mut self, name: &str) {
        push_unique(&mut self.classes, name);
    }

    pub(crate) fn push_constant(&mut self, name: &str) {
        push_unique(&mut self.constants, name);
    }
}

fn push_unique(items: &mut Vec<String>, value: &str) {
    if !items.iter().any(|existing| existing == value) {
        items.push(value.to_string());
    }
}

/// Outcome of walking a file manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub scanned: usize,
    pub skipped_packages: usize,
    pub skipped_paths: usize,
}

impl SelectionSummary {
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped_packages + self.skipped_paths
    }
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scanned: {} | Skipped packages: {} | Skipped paths: {}",
            self.scanned, self.skipped_packages, self.skipped_paths
        )
    }
}

/// Snapshot of the three query views handed to the rewriting pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// `(original, replacement)` pairs, shortest original first
    pub namespaces: Vec<(String, String)>,
    pub classes: Vec<String>,
    pub constants: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declarations_deduplicate_in_source_order() {
        let mut decls = FileDeclarations::default();
        decls.push_class("Foo");
        decls.push_class("Bar");
        decls.push_class("Foo");
        assert_eq!(decls.classes, vec!["Foo", "Bar"]);
        assert!(!decls.is_empty());
    }

    #[test]
    fn test_layout_names() {
        assert_eq!(FileLayout::Global.as_str(), "global");
        assert_eq!(
            FileLayout::SingleNamespace("A".to_string()).as_str(),
            "single-namespace"
        );
        assert_eq!(FileLayout::Blocks(2).as_str(), "blocks");
    }

    #[test]
    fn test_manifest_deserializes_from_json() {
        let raw = r#"{
            "psr/log/src/LoggerInterface.php": {
                "package_name": "psr/log",
                "source_absolute_path": "/project/vendor/psr/log/src/LoggerInterface.php",
                "target_relative_path": "psr/log/src/LoggerInterface.php"
            }
        }"#;
        let manifest: FileManifest = serde_json::from_str(raw).unwrap();
        let record = &manifest["psr/log/src/LoggerInterface.php"];
        assert_eq!(record.package_name, "psr/log");
        assert_eq!(record.target_relative_path, "psr/log/src/LoggerInterface.php");
    }

    #[test]
    fn test_manifest_iterates_in_path_order() {
        let mut manifest = FileManifest::new();
        for relative in ["zeta/b/Z.php", "acme/a/A.php", "mid/m/M.php"] {
            manifest.insert(
                relative.to_string(),
                FileRecord::new("pkg", format!("/src/{relative}"), relative),
            );
        }
        let order: Vec<&str> = manifest.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["acme/a/A.php", "mid/m/M.php", "zeta/b/Z.php"]);
    }

    #[test]
    fn test_summary_display() {
        let summary = SelectionSummary {
            scanned: 3,
            skipped_packages: 1,
            skipped_paths: 2,
        };
        assert_eq!(summary.skipped(), 3);
        assert_eq!(
            summary.to_string(),
            "Scanned: 3 | Skipped packages: 1 | Skipped paths: 2"
        );
    }
}
