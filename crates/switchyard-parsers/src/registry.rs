use std::sync::Arc;

use dashmap::DashMap;

use crate::{ParserVariant, ToolCallParser};

/// Built-in prefixes, most specific first
pub const DEFAULT_ENTRIES: [(&str, ParserVariant); 5] = [
    ("glm-4.7", ParserVariant::GlmFamily),
    ("glm4", ParserVariant::GlmFamily),
    ("glm-4", ParserVariant::GlmFamily),
    ("qwen3-coder", ParserVariant::GlmFamily),
    ("qwen3", ParserVariant::GlmFamily),
];

/// Cache key for requests that name no model
const NO_MODEL_KEY: &str = "";

/// A model-name prefix bound to a parser variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    prefix: String,
    variant: ParserVariant,
}

impl RegistryEntry {
    /// The prefix is stored lowercased and matched case-insensitively
    pub fn new(prefix: impl AsRef<str>, variant: ParserVariant) -> Self {
        Self {
            prefix: prefix.as_ref().to_lowercase(),
            variant,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub const fn variant(&self) -> ParserVariant {
        self.variant
    }

    fn matches(&self, model: &str) -> bool {
        model.starts_with(&self.prefix)
    }
}

/// Maps model names to parser instances
///
/// Entries are fixed at construction and tried in order. Instances are
/// memoized per exact model string; building one is a pure function of the
/// name, so a racing miss only costs a discarded allocation.
#[derive(Debug)]
pub struct ParserRegistry {
    entries: Vec<RegistryEntry>,
    cache: DashMap<String, Arc<dyn ToolCallParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_entries([])
    }
}

impl ParserRegistry {
    /// Registry with the built-in table only
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry consulting `extra` entries before the built-in table
    pub fn with_entries(extra: impl IntoIterator<Item = RegistryEntry>) -> Self {
        let entries = extra
            .into_iter()
            .chain(
                DEFAULT_ENTRIES
                    .iter()
                    .map(|(prefix, variant)| RegistryEntry::new(prefix, *variant)),
            )
            .collect();

        Self {
            entries,
            cache: DashMap::new(),
        }
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Variant for a model name, Generic when no prefix matches
    pub fn variant_for(&self, model: &str) -> ParserVariant {
        let model = model.to_lowercase();

        self.entries
            .iter()
            .find(|entry| entry.matches(&model))
            .map_or(ParserVariant::Generic, RegistryEntry::variant)
    }

    /// Parser instance for a model, built on first use
    ///
    /// An absent or empty model name resolves to the Generic parser.
    pub fn parser_for(&self, model: Option<&str>) -> Arc<dyn ToolCallParser> {
        let key = model.filter(|m| !m.trim().is_empty()).unwrap_or(NO_MODEL_KEY);

        if let Some(parser) = self.cache.get(key) {
            return Arc::clone(&parser);
        }

        let variant = if key == NO_MODEL_KEY {
            ParserVariant::Generic
        } else {
            self.variant_for(key)
        };
        tracing::debug!(model = key, %variant, "building tool-call parser");

        let parser: Arc<dyn ToolCallParser> = Arc::from(variant.build(key));
        Arc::clone(self.cache.entry(key.to_owned()).or_insert(parser).value())
    }

    /// Number of cached parser instances
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached instance
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glm_and_qwen_prefixes_select_glm_family() {
        let registry = ParserRegistry::new();

        for model in [
            "glm-4.7",
            "GLM-4.7-FP8",
            "glm4:9b",
            "glm-4-air",
            "glm-4.5-flash",
            "qwen3-coder:30b",
            "Qwen3-32B-Instruct",
            "qwen3:8b",
        ] {
            assert_eq!(registry.variant_for(model), ParserVariant::GlmFamily, "{model}");
        }
    }

    #[test]
    fn other_models_are_generic() {
        let registry = ParserRegistry::new();

        for model in ["llama3.1:8b", "qwen2.5-coder", "gpt-4.1", "my-glm-4", "", "claude-sonnet-4-5"] {
            assert_eq!(registry.variant_for(model), ParserVariant::Generic, "{model}");
        }
    }

    #[test]
    fn configured_entries_take_precedence() {
        let registry = ParserRegistry::with_entries([
            RegistryEntry::new("qwen3-coder-generic", ParserVariant::Generic),
            RegistryEntry::new("GLM-5", ParserVariant::GlmFamily),
        ]);

        assert_eq!(registry.variant_for("qwen3-coder-generic:7b"), ParserVariant::Generic);
        assert_eq!(registry.variant_for("qwen3-coder:30b"), ParserVariant::GlmFamily);
        assert_eq!(registry.variant_for("glm-5-plus"), ParserVariant::GlmFamily);
        assert_eq!(registry.entries()[1].prefix(), "glm-5");
    }

    #[test]
    fn instances_are_cached_per_exact_name() {
        let registry = ParserRegistry::new();

        let first = registry.parser_for(Some("glm-4.7"));
        let second = registry.parser_for(Some("glm-4.7"));
        let other_case = registry.parser_for(Some("GLM-4.7"));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other_case));
        assert_eq!(other_case.variant(), ParserVariant::GlmFamily);
        assert_eq!(other_case.model(), "GLM-4.7");
        assert_eq!(registry.cached(), 2);
    }

    #[test]
    fn missing_model_shares_one_generic_instance() {
        let registry = ParserRegistry::new();

        let none = registry.parser_for(None);
        let empty = registry.parser_for(Some(""));
        let blank = registry.parser_for(Some("  "));

        assert_eq!(none.variant(), ParserVariant::Generic);
        assert!(Arc::ptr_eq(&none, &empty));
        assert!(Arc::ptr_eq(&none, &blank));
        assert_eq!(registry.cached(), 1);
    }

    #[test]
    fn clear_cache_forces_rebuild() {
        let registry = ParserRegistry::new();
        let before = registry.parser_for(Some("qwen3:8b"));

        registry.clear_cache();
        assert_eq!(registry.cached(), 0);

        let after = registry.parser_for(Some("qwen3:8b"));
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.variant(), before.variant());
    }

    #[test]
    fn concurrent_lookups_agree() {
        let registry = Arc::new(ParserRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.parser_for(Some("glm-4.7")).variant())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), ParserVariant::GlmFamily);
        }
        assert_eq!(registry.cached(), 1);
    }
}
