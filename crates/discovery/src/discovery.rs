use crate::config::ScanConfiguration;
use crate::error::Result;
use crate::rules::RuleEngine;
use crate::scanner;
use crate::selector::{FileSelector, SkipReason};
use crate::store::DiscoveryStore;
use crate::types::{DiscoveryReport, FileManifest, SelectionSummary};
use std::path::Path;

/// One discovery run: configuration, compiled rules and the store they fill
#[derive(Debug, Clone)]
pub struct Discovery {
    config: ScanConfiguration,
    rules: RuleEngine,
    selector: FileSelector,
    store: DiscoveryStore,
}

impl Discovery {
    /// Compile every configured pattern up front
    pub fn new(config: ScanConfiguration) -> Result<Self> {
        let rules = RuleEngine::new(&config)?;
        let selector = FileSelector::new(&config)?;
        Ok(Self {
            config,
            rules,
            selector,
            store: DiscoveryStore::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ScanConfiguration {
        &self.config
    }

    /// Scan every selected file of `files` under `target_dir`.
    ///
    /// Stops at the first unreadable file; whatever was recorded before the
    /// failure stays in the store.
    pub fn scan_files(
        &mut self,
        target_dir: &Path,
        files: &FileManifest,
    ) -> Result<SelectionSummary> {
        let mut summary = SelectionSummary::default();

        for (relative_path, record) in files {
            match self.selector.skip_reason(relative_path, record) {
                Some(SkipReason::ExcludedPackage) => {
                    log::debug!(
                        "Skipping {relative_path}: package {} is excluded",
                        record.package_name
                    );
                    summary.skipped_packages += 1;
                    continue;
                }
                Some(SkipReason::ExcludedPath) => {
                    log::debug!("Skipping {relative_path}: path is excluded");
                    summary.skipped_paths += 1;
                    continue;
                }
                None => {}
            }

            let content = self.selector.read(target_dir, relative_path)?;
            self.find(&content);
            summary.scanned += 1;
        }

        let (namespaces, classes, constants) = self.store.counts();
        log::info!(
            "{summary} | Namespaces: {namespaces} | Classes: {classes} | Constants: {constants}"
        );
        Ok(summary)
    }

    /// Scan one file's content; returns it unchanged
    pub fn find<'c>(&mut self, content: &'c str) -> &'c str {
        scanner::scan(content, &self.rules, &mut self.store)
    }

    #[must_use]
    pub fn store(&self) -> &DiscoveryStore {
        &self.store
    }

    #[must_use]
    pub fn into_store(self) -> DiscoveryStore {
        self.store
    }

    #[must_use]
    pub fn discovered_namespaces(&self, current_prefix: &str) -> Vec<(String, String)> {
        self.store.discovered_namespaces(current_prefix)
    }

    #[must_use]
    pub fn discovered_classes(&self, current_class_prefix: &str) -> Vec<String> {
        self.store.discovered_classes(current_class_prefix)
    }

    #[must_use]
    pub fn discovered_constants(&self, current_constant_prefix: &str) -> Vec<String> {
        self.store.discovered_constants(current_constant_prefix)
    }

    /// Snapshot of all three views, filtered by the configured prefixes
    #[must_use]
    pub fn report(&self) -> DiscoveryReport {
        DiscoveryReport {
            namespaces: self.discovered_namespaces(&self.config.namespace_prefix),
            classes: self.discovered_classes(&self.config.classmap_prefix),
            constants: self.discovered_constants(self.config.constants_prefix_or_empty()),
        }
    }

    /// Snapshot with explicit filter prefixes
    #[must_use]
    pub fn report_with(
        &self,
        namespace_prefix: &str,
        class_prefix: &str,
        constant_prefix: &str,
    ) -> DiscoveryReport {
        DiscoveryReport {
            namespaces: self.discovered_namespaces(namespace_prefix),
            classes: self.discovered_classes(class_prefix),
            constants: self.discovered_constants(constant_prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiscoveryError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_two_blocks() {
        let mut discovery =
            Discovery::new(ScanConfiguration::with_namespace_prefix("Vendor")).unwrap();
        discovery.find("namespace A { class X {} }\nnamespace B { class Y {} }");

        let namespaces: Vec<String> = discovery
            .discovered_namespaces("")
            .into_iter()
            .map(|(original, _)| original)
            .collect();
        assert_eq!(namespaces, vec!["A", "B"]);
        assert_eq!(discovery.discovered_classes(""), vec!["X", "Y"]);
    }

    #[test]
    fn test_report_uses_configured_prefixes() {
        let config = ScanConfiguration::with_namespace_prefix("Vendor")
            .classmap_prefix("Vendor_")
            .constants_prefix("VENDOR_");
        let mut discovery = Discovery::new(config).unwrap();
        discovery.find(
            "<?php\nclass Vendor_Foo {}\nclass Bar {}\ndefine('VENDOR_X', '1');\ndefine('Y', '2');\n",
        );

        let report = discovery.report();
        assert_eq!(report.classes, vec!["Bar"]);
        assert_eq!(report.constants, vec!["Y"]);

        let unfiltered = discovery.report_with("", "", "");
        assert_eq!(unfiltered.classes, vec!["Bar", "Vendor_Foo"]);
    }

    #[test]
    fn test_bad_exclusion_pattern_fails_before_scanning() {
        let config = ScanConfiguration::default().exclude_file_pattern("/[unclosed/");
        assert!(matches!(
            Discovery::new(config),
            Err(DiscoveryError::Configuration { .. })
        ));
    }
}
