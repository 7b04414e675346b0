use serde::Deserialize;

/// Tool-call parser registry configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsersConfig {
    /// Extra registry entries, consulted in order before the built-in table
    #[serde(default)]
    pub entries: Vec<ParserEntryConfig>,
}

/// A single model-name prefix to parser variant mapping
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserEntryConfig {
    /// Case-insensitive model name prefix
    pub prefix: String,
    /// Parser variant for matching models
    pub variant: ParserVariantName,
}

/// Parser variants selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserVariantName {
    /// JSON-in-prose extraction
    Generic,
    /// GLM/Qwen XML tool-call tags and shell heuristics
    #[serde(alias = "glm_family", alias = "qwen")]
    Glm,
}
