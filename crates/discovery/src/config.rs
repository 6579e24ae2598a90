use crate::error::{DiscoveryError, Result};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Configuration for one discovery run
///
/// Built once before any file is scanned and never mutated afterwards. Pattern
/// strings are kept raw here; they are compiled when a `Discovery` is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfiguration {
    /// Prefix prepended to namespaces that no replacement rule handles
    pub namespace_prefix: String,

    /// Prefix used for global classes by the rewriting pass
    pub classmap_prefix: String,

    /// Prefix used for global constants by the rewriting pass
    #[serde(alias = "constant_prefix")]
    pub constants_prefix: Option<String>,

    /// Packages whose files are never scanned (exact name match)
    pub excluded_package_names: Vec<String>,

    /// Namespaces starting with any of these are left untouched
    pub excluded_namespace_prefixes: Vec<String>,

    /// Relative file paths matching any of these patterns are never scanned
    pub excluded_file_path_patterns: Vec<String>,

    /// Ordered namespace rewrite rules; the first one that changes a namespace wins
    #[serde(
        alias = "namespace_replacement_patterns",
        deserialize_with = "rules_in_order"
    )]
    pub namespace_replacement_rules: Vec<ReplacementRule>,
}

/// A single namespace rewrite rule: pattern plus replacement template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    /// Regular expression, bare or `/…/flags` delimited
    pub pattern: String,

    /// Replacement template; `$1`, `${1}` and `\1` refer to capture groups
    pub replacement: String,
}

impl ReplacementRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

impl ScanConfiguration {
    /// Create a configuration with only the namespace prefix set
    pub fn with_namespace_prefix(prefix: impl Into<String>) -> Self {
        Self {
            namespace_prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Builder: set classmap prefix
    #[must_use]
    pub fn classmap_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.classmap_prefix = prefix.into();
        self
    }

    /// Builder: set constants prefix
    #[must_use]
    pub fn constants_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.constants_prefix = Some(prefix.into());
        self
    }

    /// Builder: exclude a package from scanning
    #[must_use]
    pub fn exclude_package(mut self, package: impl Into<String>) -> Self {
        self.excluded_package_names.push(package.into());
        self
    }

    /// Builder: exclude a namespace prefix from renaming
    #[must_use]
    pub fn exclude_namespace(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_namespace_prefixes.push(prefix.into());
        self
    }

    /// Builder: exclude relative file paths matching `pattern`
    #[must_use]
    pub fn exclude_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.excluded_file_path_patterns.push(pattern.into());
        self
    }

    /// Builder: append a namespace replacement rule
    #[must_use]
    pub fn replacement_rule(
        mut self,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.namespace_replacement_rules
            .push(ReplacementRule::new(pattern, replacement));
        self
    }

    /// Prefix used when filtering constants; empty when none is configured
    pub fn constants_prefix_or_empty(&self) -> &str {
        self.constants_prefix.as_deref().unwrap_or("")
    }

    /// Parse a configuration from TOML
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| DiscoveryError::config_format(e.to_string()))
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| DiscoveryError::config_format(e.to_string()))
    }

    /// Parse the `extra.strauss` section of a `composer.json` document
    pub fn from_composer_json(raw: &str) -> Result<Self> {
        let composer: ComposerDocument = serde_json::from_str(raw)
            .map_err(|e| DiscoveryError::config_format(e.to_string()))?;
        composer
            .extra
            .and_then(|extra| extra.strauss)
            .map(Self::from)
            .ok_or_else(|| DiscoveryError::config_format("composer.json has no extra.strauss section"))
    }

    /// Load a configuration file, picking the format from its name
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| DiscoveryError::read(path, e))?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if file_name.eq_ignore_ascii_case("composer.json") {
            return Self::from_composer_json(&raw);
        }

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("toml") => Self::from_toml_str(&raw),
            Some("json") => Self::from_json_str(&raw),
            other => Err(DiscoveryError::config_format(format!(
                "unsupported configuration format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

#[derive(Deserialize)]
struct ComposerDocument {
    extra: Option<ComposerExtra>,
}

#[derive(Deserialize)]
struct ComposerExtra {
    strauss: Option<StraussSection>,
}

/// Configuration as it appears under `extra.strauss` in composer.json
#[derive(Default, Deserialize)]
#[serde(default)]
struct StraussSection {
    namespace_prefix: String,
    classmap_prefix: String,
    constant_prefix: Option<String>,
    exclude_from_prefix: ExcludeFromPrefix,
    #[serde(deserialize_with = "rules_in_order")]
    namespace_replacement_patterns: Vec<ReplacementRule>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ExcludeFromPrefix {
    packages: Vec<String>,
    namespaces: Vec<String>,
    file_patterns: Vec<String>,
}

impl From<StraussSection> for ScanConfiguration {
    fn from(section: StraussSection) -> Self {
        Self {
            namespace_prefix: section.namespace_prefix.trim_end_matches('\\').to_string(),
            classmap_prefix: section.classmap_prefix,
            constants_prefix: section.constant_prefix,
            excluded_package_names: section.exclude_from_prefix.packages,
            excluded_namespace_prefixes: section.exclude_from_prefix.namespaces,
            excluded_file_path_patterns: section.exclude_from_prefix.file_patterns,
            namespace_replacement_rules: section.namespace_replacement_patterns,
        }
    }
}

/// Accept rules either as a list of `{pattern, replacement}` records or as a
/// `{pattern: replacement}` table, keeping document order in both cases.
fn rules_in_order<'de, D>(deserializer: D) -> std::result::Result<Vec<ReplacementRule>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RulesVisitor;

    impl<'de> Visitor<'de> for RulesVisitor {
        type Value = Vec<ReplacementRule>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a list of {pattern, replacement} rules or a pattern -> replacement table")
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut rules = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(rule) = seq.next_element::<ReplacementRule>()? {
                rules.push(rule);
            }
            Ok(rules)
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut rules = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((pattern, replacement)) = map.next_entry::<String, String>()? {
                rules.push(ReplacementRule {
                    pattern,
                    replacement,
                });
            }
            Ok(rules)
        }
    }

    deserializer.deserialize_any(RulesVisitor)
}
