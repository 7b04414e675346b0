//! Heuristic request analysis
//!
//! Estimates how demanding a canonical request is from its token count, the
//! shape of the conversation and keyword signals in the latest user turn.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tiktoken_rs::o200k_base;

use crate::tier::Tier;

/// Token count above which a general request stops being simple
const SIMPLE_TOKEN_LIMIT: usize = 500;

/// Token count above which any request is complex
const COMPLEX_TOKEN_LIMIT: usize = 4_000;

/// Message count above which a conversation is bumped one tier
const LONG_CONVERSATION: usize = 10;

/// What the latest user turn is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Multi-step reasoning, proofs, math
    Reasoning,
    /// Writing, reviewing or debugging code
    Code,
    /// Short factual question
    Lookup,
    General,
}

/// Signals extracted from a canonical request
#[derive(Debug, Clone)]
pub struct RequestProfile {
    pub estimated_tokens: usize,
    pub task: TaskKind,
    pub tool_count: usize,
    pub message_count: usize,
    /// Assistant turns that already invoked tools
    pub tool_turns: usize,
}

impl RequestProfile {
    /// Profile a canonical request payload
    pub fn from_payload(payload: &Value) -> Self {
        let messages = payload
            .get("messages")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);

        let mut text = system_text(payload.get("system"));
        for message in messages {
            text.push_str(&content_text(message.get("content")));
            text.push('\n');
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.get("role").and_then(Value::as_str) == Some("user"))
            .map(|m| content_text(m.get("content")))
            .unwrap_or_default();

        Self {
            estimated_tokens: estimate_tokens(&text),
            task: classify_task(&last_user),
            tool_count: tool_count(payload),
            message_count: messages.len(),
            tool_turns: messages.iter().filter(|m| invokes_tools(m)).count(),
        }
    }

    /// Tier this profile calls for
    pub fn tier(&self) -> Tier {
        if self.task == TaskKind::Reasoning {
            return Tier::Reasoning;
        }

        let mut tier = match self.task {
            TaskKind::Lookup => Tier::Simple,
            TaskKind::Code => Tier::Medium,
            _ if self.estimated_tokens > SIMPLE_TOKEN_LIMIT => Tier::Medium,
            _ => Tier::Simple,
        };

        if self.estimated_tokens > COMPLEX_TOKEN_LIMIT {
            tier = Tier::Complex;
        }

        // Agentic loops need a model that keeps tool state straight
        if self.tool_count > 0 && self.tool_turns > 0 {
            tier = tier.max(Tier::Complex);
        } else if self.tool_count > 0 {
            tier = tier.max(Tier::Medium);
        }

        if self.message_count > LONG_CONVERSATION {
            tier = tier.bump();
        }

        tier.min(Tier::Complex)
    }
}

/// Number of tool definitions offered with the request
pub fn tool_count(payload: &Value) -> usize {
    payload.get("tools").and_then(Value::as_array).map_or(0, Vec::len)
}

fn system_text(system: Option<&Value>) -> String {
    let mut text = content_text(system);
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// Plain text of a string or a list of content blocks
fn content_text(content: Option<&Value>) -> String {
    match content {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(blocks)) => blocks
            .iter()
            .filter_map(|block| match block.get("type").and_then(Value::as_str) {
                Some("text") => block.get("text").and_then(Value::as_str).map(str::to_owned),
                Some("tool_result") => Some(content_text(block.get("content"))),
                Some("tool_use") => block.get("input").map(Value::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn invokes_tools(message: &Value) -> bool {
    if message.get("role").and_then(Value::as_str) != Some("assistant") {
        return false;
    }

    message.get("tool_calls").and_then(Value::as_array).is_some_and(|c| !c.is_empty())
        || message
            .get("content")
            .and_then(Value::as_array)
            .is_some_and(|blocks| {
                blocks
                    .iter()
                    .any(|b| b.get("type").and_then(Value::as_str) == Some("tool_use"))
            })
}

fn estimate_tokens(text: &str) -> usize {
    o200k_base().map_or_else(|_| text.len() / 4, |bpe| bpe.encode_with_special_tokens(text).len())
}

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\w*\n").expect("must be valid regex"));

static SOURCE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w./\\-]+\.(?:rs|ts|tsx|js|jsx|py|go|java|cpp|c|h|rb|php|swift|kt|toml|yaml|yml)\b")
        .expect("must be valid regex")
});

static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:fn |def |func |function |class |impl |async fn )\w+\s*[\(<{:]").expect("must be valid regex")
});

static LATEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:frac|sum|int|prod|lim|sqrt|begin\{equation\})").expect("must be valid regex"));

const REASONING_KEYWORDS: [&str; 10] = [
    "step by step",
    "think carefully",
    "reason through",
    "prove that",
    "proof",
    "derive",
    "theorem",
    "trade-offs",
    "tradeoffs",
    "architecture",
];

const CODE_KEYWORDS: [&str; 10] = [
    "implement",
    "refactor",
    "debug",
    "compile",
    "stack trace",
    "unit test",
    "write a function",
    "fix the bug",
    "code review",
    "syntax error",
];

const LOOKUP_PREFIXES: [&str; 8] = [
    "what is",
    "what are",
    "who is",
    "when did",
    "where is",
    "how many",
    "define ",
    "what does",
];

fn classify_task(text: &str) -> TaskKind {
    let lower = text.to_lowercase();

    if LATEX_RE.is_match(text) || REASONING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        TaskKind::Reasoning
    } else if CODE_FENCE_RE.is_match(text)
        || SOURCE_PATH_RE.is_match(text)
        || SIGNATURE_RE.is_match(text)
        || CODE_KEYWORDS.iter().any(|k| lower.contains(k))
    {
        TaskKind::Code
    } else if text.len() <= 200 && LOOKUP_PREFIXES.iter().any(|p| lower.trim_start().starts_with(p)) {
        TaskKind::Lookup
    } else {
        TaskKind::General
    }
}
