use serde::{Deserialize, Serialize};

use super::message::{ContentBlock, Role};

/// Canonical completion response in the Anthropic Messages shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Unique response identifier
    pub id: String,
    /// Always `message`
    #[serde(rename = "type", default = "message_type")]
    pub kind: String,
    pub role: Role,
    /// Model that produced the response
    pub model: String,
    /// Generated content blocks
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
    #[serde(default)]
    pub stop_sequence: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

fn message_type() -> String {
    "message".to_owned()
}

impl CompletionResponse {
    /// Assistant response with a fresh `msg_` ID
    pub fn assistant(model: impl Into<String>, content: Vec<ContentBlock>) -> Self {
        Self {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            kind: message_type(),
            role: Role::Assistant,
            model: model.into(),
            content,
            stop_reason: None,
            stop_sequence: None,
            usage: Usage::default(),
        }
    }

    /// Concatenated text of all text blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn has_tool_use(&self) -> bool {
        self.content.iter().any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// Natural end of the turn
    EndTurn,
    /// Output token limit reached
    MaxTokens,
    /// A stop sequence was generated
    StopSequence,
    /// The model invoked a tool
    ToolUse,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}
