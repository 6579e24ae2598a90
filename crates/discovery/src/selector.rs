use crate::config::ScanConfiguration;
use crate::error::{DiscoveryError, Result};
use crate::pattern;
use crate::types::FileRecord;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

/// Why a file was left out of the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ExcludedPackage,
    ExcludedPath,
}

/// Filters the file manifest down to the files worth scanning
#[derive(Debug, Clone)]
pub struct FileSelector {
    excluded_packages: BTreeSet<String>,
    excluded_paths: Vec<Regex>,
}

impl FileSelector {
    pub fn new(config: &ScanConfiguration) -> Result<Self> {
        let excluded_paths = config
            .excluded_file_path_patterns
            .iter()
            .map(|raw| pattern::compile(raw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            excluded_packages: config.excluded_package_names.iter().cloned().collect(),
            excluded_paths,
        })
    }

    /// Decide whether `relative_path` is skipped, package exclusion first
    #[must_use]
    pub fn skip_reason(&self, relative_path: &str, record: &FileRecord) -> Option<SkipReason> {
        if self.excluded_packages.contains(&record.package_name) {
            return Some(SkipReason::ExcludedPackage);
        }
        if self.excluded_paths.iter().any(|re| re.is_match(relative_path)) {
            return Some(SkipReason::ExcludedPath);
        }
        None
    }

    /// Read a selected file from under `target_dir`.
    ///
    /// Content that is not valid UTF-8 (Latin-1 headers and the like) is
    /// decoded lossily; only open/read failures are errors. Leading
    /// separators on `relative_path` are ignored so the file always resolves
    /// inside `target_dir`.
    pub fn read(&self, target_dir: &Path, relative_path: &str) -> Result<String> {
        let path = target_dir.join(relative_path.trim_start_matches(['/', '\\']));
        let bytes = std::fs::read(&path).map_err(|e| DiscoveryError::read(&path, e))?;
        Ok(match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => {
                log::debug!("{} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        })
    }
}
