use indexmap::IndexMap;

/// Local models whose tool-calling support is known, most specific first
///
/// Prefixes are matched against the lowercased model name, so tags such as
/// `:8b` or `-instruct` do not need their own entries.
const KNOWN_LOCAL_MODELS: &[(&str, bool)] = &[
    ("llama3.2:1b", false),
    ("llama3.2:3b", true),
    ("llama3.3", true),
    ("llama3.2", true),
    ("llama3.1", true),
    ("llama3", false),
    ("llama2", false),
    ("codellama", false),
    ("qwen3-coder", true),
    ("qwen3", true),
    ("qwen2.5-coder", true),
    ("qwen2.5", true),
    ("glm4", true),
    ("glm-4", true),
    ("mistral-nemo", true),
    ("mistral-small", true),
    ("mistral", true),
    ("gpt-oss", true),
    ("deepseek-r1", false),
    ("deepseek-coder", false),
    ("gemma3", false),
    ("gemma2", false),
    ("gemma", false),
    ("phi4-mini", true),
    ("phi4", false),
    ("phi3", false),
    ("tinyllama", false),
];

/// Tool-calling support table for local models
///
/// Configured overrides are consulted before the built-in table. A model
/// found in neither is unknown, which routing treats as capable.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    overrides: Vec<(String, bool)>,
}

impl CapabilityTable {
    pub fn new(overrides: &IndexMap<String, bool>) -> Self {
        Self {
            overrides: overrides
                .iter()
                .map(|(prefix, supported)| (prefix.to_lowercase(), *supported))
                .collect(),
        }
    }

    /// Whether a local model can call tools, if known
    pub fn supports_tools(&self, model: &str) -> Option<bool> {
        let model = model.trim().to_lowercase();
        if model.is_empty() {
            return None;
        }

        // Strip a namespace such as `library/` or `hf.co/org/`
        let base = model.rsplit('/').next().unwrap_or(&model);

        self.overrides
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix.as_str()) || base.starts_with(prefix.as_str()))
            .map(|(_, supported)| *supported)
            .or_else(|| {
                KNOWN_LOCAL_MODELS
                    .iter()
                    .find(|(prefix, _)| base.starts_with(*prefix))
                    .map(|(_, supported)| *supported)
            })
    }
}
