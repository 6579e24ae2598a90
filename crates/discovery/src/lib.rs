//! # nsprefix discovery
//!
//! Finds every globally visible symbol in vendored PHP packages (namespaces,
//! classes/interfaces/traits, `define()` constants) and computes what each
//! namespace should be renamed to. Nothing is rewritten here; the result is
//! an inventory for a later renaming pass.
//!
//! ## Architecture
//!
//! ```text
//! FileManifest (relative path → FileRecord)
//!     │
//!     ├──> File Selector
//!     │    ├─> skip excluded packages
//!     │    ├─> skip excluded path patterns
//!     │    └─> read target_dir/relative_path
//!     │
//!     ├──> Declaration Scanner
//!     │    ├─> Lexer (comments, strings, heredocs, inline HTML skipped)
//!     │    └─> namespaces, classes, define() constants
//!     │
//!     ├──> Rule Engine (per namespace)
//!     │    ├─> excluded prefix → dropped
//!     │    ├─> first matching replacement rule
//!     │    └─> fallback: prefix\namespace
//!     │
//!     └──> Discovery Store
//!          └─> Query views: namespaces (shortest first), classes, constants
//! ```
//!
//! ## Example
//!
//! ```rust
//! use nsprefix_discovery::{Discovery, ScanConfiguration};
//!
//! let config = ScanConfiguration::with_namespace_prefix("Vendor");
//! let mut discovery = Discovery::new(config).unwrap();
//!
//! discovery.find("<?php\nnamespace Foo\\Bar;\nclass Baz {}\n");
//!
//! assert_eq!(
//!     discovery.discovered_namespaces(""),
//!     vec![("Foo\\Bar".to_string(), "Vendor\\Foo\\Bar".to_string())]
//! );
//! assert_eq!(discovery.discovered_classes(""), vec!["Baz".to_string()]);
//! ```

mod config;
mod discovery;
mod error;
mod lexer;
mod pattern;
mod rules;
mod scanner;
mod selector;
mod store;
mod types;

pub use config::{ReplacementRule, ScanConfiguration};
pub use discovery::Discovery;
pub use error::{DiscoveryError, Result};
pub use pattern::ReplacementPattern;
pub use rules::RuleEngine;
pub use scanner::{extract_declarations, scan};
pub use selector::{FileSelector, SkipReason};
pub use store::{DiscoveryStore, REFLECTION_SENTINEL};
pub use types::{
    DiscoveryReport, FileDeclarations, FileLayout, FileManifest, FileRecord, SelectionSummary,
};
