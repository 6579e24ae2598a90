use crate::config::ScanConfiguration;
use crate::error::Result;
use crate::pattern::ReplacementPattern;
use crate::store::DiscoveryStore;

/// Decides whether a namespace is renamed, and to what
#[derive(Debug, Clone)]
pub struct RuleEngine {
    namespace_prefix: String,
    excluded_prefixes: Vec<String>,
    replacements: Vec<ReplacementPattern>,
}

impl RuleEngine {
    /// Compile the replacement rules of `config`.
    ///
    /// Fails with a configuration error on the first malformed pattern.
    pub fn new(config: &ScanConfiguration) -> Result<Self> {
        let replacements = config
            .namespace_replacement_rules
            .iter()
            .map(|rule| ReplacementPattern::compile(&rule.pattern, &rule.replacement))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            namespace_prefix: config.namespace_prefix.trim_end_matches('\\').to_string(),
            excluded_prefixes: config.excluded_namespace_prefixes.clone(),
            replacements,
        })
    }

    /// An empty configured prefix matches, and so excludes, every namespace
    #[must_use]
    pub fn is_excluded(&self, namespace: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| namespace.starts_with(prefix.as_str()))
    }

    /// Replacement for `namespace`, or `None` when it is excluded
    #[must_use]
    pub fn replacement_for(&self, namespace: &str) -> Option<String> {
        if self.is_excluded(namespace) {
            return None;
        }

        for rule in &self.replacements {
            let replaced = rule.apply(namespace);
            if replaced != namespace {
                return Some(replaced.into_owned());
            }
        }

        Some(format!("{}\\{}", self.namespace_prefix, namespace))
    }

    /// Record the mapping for `namespace` unless it is excluded
    pub fn register_namespace(&self, namespace: &str, store: &mut DiscoveryStore) {
        match self.replacement_for(namespace) {
            Some(replacement) => {
                log::trace!("Namespace {namespace} -> {replacement}");
                store.record_namespace(namespace, replacement);
            }
            None => log::trace!("Namespace {namespace} excluded from renaming"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiscoveryError;
    use pretty_assertions::assert_eq;

    fn engine(config: ScanConfiguration) -> RuleEngine {
        RuleEngine::new(&config).unwrap()
    }

    #[test]
    fn test_default_fallback() {
        let rules = engine(ScanConfiguration::with_namespace_prefix("Vendor"));
        assert_eq!(
            rules.replacement_for(r"Foo\Bar").as_deref(),
            Some(r"Vendor\Foo\Bar")
        );
    }

    #[test]
    fn test_trailing_separator_on_prefix() {
        let rules = engine(ScanConfiguration::with_namespace_prefix("Vendor\\"));
        assert_eq!(rules.replacement_for("Foo").as_deref(), Some(r"Vendor\Foo"));
    }

    #[test]
    fn test_excluded_prefix_records_nothing() {
        let rules = engine(
            ScanConfiguration::with_namespace_prefix("Vendor").exclude_namespace("Psr\\"),
        );
        let mut store = DiscoveryStore::new();

        rules.register_namespace(r"Psr\Log", &mut store);
        rules.register_namespace(r"Monolog\Handler", &mut store);

        assert_eq!(store.namespace_replacement(r"Psr\Log"), None);
        assert_eq!(
            store.namespace_replacement(r"Monolog\Handler"),
            Some(r"Vendor\Monolog\Handler")
        );
    }

    #[test]
    fn test_empty_prefix_joins_with_separator() {
        let rules = engine(ScanConfiguration::default());
        assert_eq!(rules.replacement_for("Foo").as_deref(), Some(r"\Foo"));
    }

    #[test]
    fn test_empty_excluded_prefix_excludes_everything() {
        let rules = engine(ScanConfiguration::with_namespace_prefix("Vendor").exclude_namespace(""));
        let mut store = DiscoveryStore::new();

        rules.register_namespace("Foo", &mut store);
        rules.register_namespace(r"Acme\Lib", &mut store);

        assert!(store.is_empty());
    }

    #[test]
    fn test_exclusion_beats_rules() {
        let rules = engine(
            ScanConfiguration::with_namespace_prefix("Vendor")
                .exclude_namespace("Foo")
                .replacement_rule(r"/^Foo/", "Bar"),
        );
        assert_eq!(rules.replacement_for(r"Foo\Baz"), None);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = engine(
            ScanConfiguration::with_namespace_prefix("Vendor")
                .replacement_rule(r"/^Nope\\/", r"Never\")
                .replacement_rule(r"/^(Guzzle)Http\\/", r"Acme\\$1\\")
                .replacement_rule(r"/^Guzzle/", "Second"),
        );
        assert_eq!(
            rules.replacement_for(r"GuzzleHttp\Psr7").as_deref(),
            Some(r"Acme\Guzzle\Psr7")
        );
        // No rule matches: default prefix applies.
        assert_eq!(
            rules.replacement_for(r"Other\Lib").as_deref(),
            Some(r"Vendor\Other\Lib")
        );
    }

    #[test]
    fn test_register_is_idempotent() {
        let rules = engine(ScanConfiguration::with_namespace_prefix("Vendor"));
        let mut store = DiscoveryStore::new();
        rules.register_namespace("Foo", &mut store);
        let first = store.clone();
        rules.register_namespace("Foo", &mut store);
        assert_eq!(store, first);
    }

    #[test]
    fn test_bad_rule_fails_construction() {
        let config = ScanConfiguration::with_namespace_prefix("Vendor").replacement_rule("/[a-/", "x");
        assert!(matches!(
            RuleEngine::new(&config),
            Err(DiscoveryError::Configuration { .. })
        ));
    }
}
