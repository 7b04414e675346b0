//! Tool-call parsers
//!
//! Backends without native tool calling describe their tool invocations in
//! free text. A [`ToolCallParser`] recovers structured calls from that text
//! and scrubs formatting noise out of calls that did arrive structured. The
//! [`ParserRegistry`] picks the parser variant for a model name.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod call;
mod fence;
mod generic;
mod glm;
mod json_scan;
mod registry;
mod shell;
mod tags;

use std::borrow::Cow;
use std::fmt;

pub use call::{FunctionCall, FunctionSpec, InputCall, ToolCall};
pub use generic::GenericParser;
pub use glm::GlmParser;
pub use registry::{DEFAULT_ENTRIES, ParserRegistry, RegistryEntry};
pub use shell::{SHELL_TOOL, is_shell_tool};

/// Parser implementations known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ParserVariant {
    /// JSON object extraction, shell command scrubbing
    Generic,
    /// GLM-4.x and Qwen3 tag formats
    GlmFamily,
}

impl ParserVariant {
    /// Construct a parser of this variant for a model
    pub fn build(self, model: &str) -> Box<dyn ToolCallParser> {
        match self {
            Self::Generic => Box::new(GenericParser::new(model)),
            Self::GlmFamily => Box::new(GlmParser::new(model)),
        }
    }
}

/// How a set of tool calls was recovered from text
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// A JSON object with `name` and `parameters`
    JsonObject,
    /// `<tool_call>` blocks with `<arg_key>`/`<arg_value>` pairs
    ToolCallTags,
    /// Bulleted lines that start with a shell command
    BulletCommands,
    /// Commands inside fenced shell code blocks
    FencedShell,
}

/// Tool calls recovered from text, with the strategy that found them
#[derive(Debug, Clone, PartialEq)]
pub struct Recovery {
    pub strategy: Strategy,
    pub calls: Vec<ToolCall>,
}

/// Capabilities shared by every parser variant
///
/// Only [`ToolCallParser::recover`] and [`ToolCallParser::variant`] are
/// required. The remaining operations default to identity, except reasoning
/// tag removal which deletes complete `<think>` pairs.
pub trait ToolCallParser: Send + Sync + fmt::Debug {
    /// The variant this parser implements
    fn variant(&self) -> ParserVariant;

    /// The model name this parser was built for
    fn model(&self) -> &str;

    /// Recover tool calls from free text, reporting the strategy used
    ///
    /// Returns `None` when the text holds no recognizable tool call. Never
    /// fails on malformed input.
    fn recover(&self, text: &str) -> Option<Recovery>;

    /// Recover tool calls from free text
    fn extract_tool_calls(&self, text: &str) -> Option<Vec<ToolCall>> {
        self.recover(text).map(|recovery| recovery.calls)
    }

    /// Normalize calls that arrived structured
    fn normalize_tool_calls(&self, calls: Vec<ToolCall>) -> Vec<ToolCall> {
        calls
    }

    /// Clean a single call's arguments
    ///
    /// `Cow::Borrowed` means the call needed no changes.
    fn clean_arguments<'a>(&self, call: &'a ToolCall) -> Cow<'a, ToolCall> {
        Cow::Borrowed(call)
    }

    /// Remove reasoning blocks from model output
    fn strip_reasoning_tags<'a>(&self, text: &'a str) -> Cow<'a, str> {
        tags::strip_reasoning_pairs(text)
    }
}
