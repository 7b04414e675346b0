use serde::Serialize;

use crate::error::LlmError;

/// Bedrock model family, which decides the invocation body shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelFamily {
    /// Anthropic Claude, Messages API body
    Claude,
    /// Amazon Titan Text
    Titan,
    /// Meta Llama
    Llama,
    /// AI21 Jurassic-2
    Jurassic,
    /// Cohere Command
    Cohere,
    Mistral,
}

/// Vendor markers, checked as substrings so that cross-region inference
/// profiles (`us.`, `eu.`, `apac.`, `global.`) and ARNs match as well
const FAMILY_MARKERS: &[(&str, ModelFamily)] = &[
    ("anthropic.claude", ModelFamily::Claude),
    ("amazon.titan-text", ModelFamily::Titan),
    ("amazon.titan-tg1", ModelFamily::Titan),
    ("meta.llama", ModelFamily::Llama),
    ("ai21.j2", ModelFamily::Jurassic),
    ("cohere.command", ModelFamily::Cohere),
    ("mistral.", ModelFamily::Mistral),
];

impl ModelFamily {
    /// Detect the family of a Bedrock model ID
    pub fn detect(model: &str) -> Result<Self, LlmError> {
        let id = model.to_ascii_lowercase();
        FAMILY_MARKERS
            .iter()
            .find(|(marker, _)| id.contains(marker))
            .map(|(_, family)| *family)
            .ok_or_else(|| LlmError::UnsupportedModel {
                model: model.to_owned(),
            })
    }
}
