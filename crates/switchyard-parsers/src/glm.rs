use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::call::ToolCall;
use crate::shell::{self, SHELL_LANGUAGES, SHELL_TOOL};
use crate::{ParserVariant, Recovery, Strategy, ToolCallParser, fence, tags};

const TOOL_CALL_OPEN: &str = "<tool_call>";
const TOOL_CALL_CLOSE: &str = "</tool_call>";
const ARG_KEY_OPEN: &str = "<arg_key>";
const ARG_KEY_CLOSE: &str = "</arg_key>";
const ARG_VALUE_OPEN: &str = "<arg_value>";
const ARG_VALUE_CLOSE: &str = "</arg_value>";

/// Parser for GLM-4.x style output, also used for Qwen3
///
/// These models write `<tool_call>` blocks with key/value argument tags, and
/// when they lose the format they tend to fall back to bulleted or fenced
/// shell commands.
#[derive(Debug, Clone)]
pub struct GlmParser {
    model: String,
}

impl GlmParser {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

impl ToolCallParser for GlmParser {
    fn variant(&self) -> ParserVariant {
        ParserVariant::GlmFamily
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn recover(&self, text: &str) -> Option<Recovery> {
        if text.trim().is_empty() {
            return None;
        }

        let text = tags::hygiene(text);

        let strategies: [(Strategy, fn(&str) -> Vec<ToolCall>); 3] = [
            (Strategy::ToolCallTags, tool_call_blocks),
            (Strategy::BulletCommands, bullet_commands),
            (Strategy::FencedShell, fenced_shell_commands),
        ];

        strategies.into_iter().find_map(|(strategy, extract)| {
            let calls = extract(&text);
            (!calls.is_empty()).then(|| {
                tracing::debug!(model = %self.model, %strategy, count = calls.len(), "recovered tool calls from text");
                Recovery { strategy, calls }
            })
        })
    }

    fn normalize_tool_calls(&self, calls: Vec<ToolCall>) -> Vec<ToolCall> {
        calls
            .into_iter()
            .map(|call| match self.clean_arguments(&call) {
                Cow::Borrowed(_) => call,
                Cow::Owned(cleaned) => cleaned,
            })
            .collect()
    }

    fn clean_arguments<'a>(&self, call: &'a ToolCall) -> Cow<'a, ToolCall> {
        shell::clean_shell_call(call)
    }
}

/// `<tool_call>Name<arg_key>k</arg_key><arg_value>v</arg_value></tool_call>`
fn tool_call_blocks(text: &str) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(TOOL_CALL_OPEN) {
        let body_start = open + TOOL_CALL_OPEN.len();
        let Some(close) = rest[body_start..].find(TOOL_CALL_CLOSE) else { break };
        let body = &rest[body_start..body_start + close];
        rest = &rest[body_start + close + TOOL_CALL_CLOSE.len()..];

        let name = body.find(ARG_KEY_OPEN).map_or(body, |at| &body[..at]).trim();
        if name.is_empty() {
            continue;
        }

        calls.push(ToolCall::function(name, argument_pairs(body)));
    }

    calls
}

/// Key/value tag pairs in order; a repeated key keeps its last value
fn argument_pairs(body: &str) -> Map<String, Value> {
    let mut arguments = Map::new();
    let mut rest = body;

    while let Some((key, after_key)) = between(rest, ARG_KEY_OPEN, ARG_KEY_CLOSE) {
        let Some((value, after_value)) = between(after_key, ARG_VALUE_OPEN, ARG_VALUE_CLOSE) else { break };

        arguments.insert(key.trim().to_owned(), Value::String(trim_one_newline(value).to_owned()));
        rest = after_value;
    }

    arguments
}

/// Content between the first `open` and the following `close`, plus the rest
fn between<'a>(text: &'a str, open: &str, close: &str) -> Option<(&'a str, &'a str)> {
    let start = text.find(open)? + open.len();
    let len = text[start..].find(close)?;
    Some((&text[start..start + len], &text[start + len + close.len()..]))
}

fn trim_one_newline(value: &str) -> &str {
    let value = value.strip_prefix('\n').unwrap_or(value);
    value.strip_suffix('\n').unwrap_or(value)
}

/// `- git status` style lines naming a known command
fn bullet_commands(text: &str) -> Vec<ToolCall> {
    text.lines()
        .filter_map(shell::strip_bullet)
        .map(|rest| rest.trim().trim_matches('`').trim())
        .filter(|command| shell::is_known_command(command))
        .map(shell_call)
        .collect()
}

/// Known commands inside fenced blocks tagged with a shell language
fn fenced_shell_commands(text: &str) -> Vec<ToolCall> {
    fence::fenced_blocks(text)
        .into_iter()
        .filter(|block| SHELL_LANGUAGES.iter().any(|lang| block.lang.eq_ignore_ascii_case(lang)))
        .flat_map(|block| block.body.lines())
        .map(|line| shell::strip_prompt(line).unwrap_or(line).trim())
        .filter(|line| !line.is_empty() && shell::is_known_command(line))
        .map(shell_call)
        .collect()
}

fn shell_call(command: &str) -> ToolCall {
    let mut arguments = Map::new();
    arguments.insert("command".to_owned(), Value::String(command.to_owned()));
    ToolCall::function(SHELL_TOOL, arguments)
}
