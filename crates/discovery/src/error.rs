use std::path::PathBuf;
use thiserror::Error;

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors that can occur during a discovery run
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A target file could not be read; the whole run is aborted
    #[error("Failed to read file at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured exclusion or replacement pattern did not compile
    #[error("Invalid pattern {pattern:?}: {source}")]
    Configuration {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A configuration file could not be turned into a `ScanConfiguration`
    #[error("Invalid configuration: {0}")]
    ConfigFormat(String),
}

impl DiscoveryError {
    /// Create a read error for `path`
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a pattern compilation error
    pub fn configuration(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Configuration {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a configuration format error
    pub fn config_format(msg: impl Into<String>) -> Self {
        Self::ConfigFormat(msg.into())
    }
}
