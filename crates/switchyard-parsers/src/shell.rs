use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::call::ToolCall;
use crate::fence;

/// Name of the shell-execution tool
pub const SHELL_TOOL: &str = "Bash";

const SHELL_ALIASES: [&str; 1] = ["shell"];

const BULLETS: [char; 7] = ['-', '*', '•', '→', '➜', '▸', '>'];

const PROMPTS: [char; 2] = ['$', '#'];

/// Fence info strings that mark a block as shell input
pub const SHELL_LANGUAGES: [&str; 6] = ["bash", "sh", "shell", "zsh", "console", "terminal"];

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:sudo\s+)?(?:ls|cd|pwd|cat|head|tail|less|grep|rg|find|fd|tree|wc|sort|uniq|diff|echo|printf|mkdir|rmdir|rm|cp|mv|touch|chmod|chown|ln|tar|unzip|curl|wget|ssh|scp|git|gh|npm|npx|yarn|pnpm|bun|node|deno|python|python3|pip|pip3|uv|pytest|cargo|rustc|rustup|go|make|cmake|docker|kubectl|helm|terraform|sed|awk|jq|which|env|export|source|bash|sh|zsh|ps|kill|top|du|df)(?:\s|$)",
    )
    .expect("must be valid regex")
});

/// Whether a tool name refers to the shell-execution tool
pub fn is_shell_tool(name: &str) -> bool {
    name.eq_ignore_ascii_case(SHELL_TOOL) || SHELL_ALIASES.iter().any(|alias| name.eq_ignore_ascii_case(alias))
}

/// Whether a line starts with a recognized command-line program
pub fn is_known_command(line: &str) -> bool {
    COMMAND_RE.is_match(line)
}

/// The rest of a line after one leading bullet glyph and its spacing
pub fn strip_bullet(line: &str) -> Option<&str> {
    strip_marker(line, &BULLETS)
}

/// The rest of a line after one leading prompt character and its spacing
pub fn strip_prompt(line: &str) -> Option<&str> {
    strip_marker(line, &PROMPTS)
}

fn strip_marker<'a>(line: &'a str, markers: &[char]) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix(markers)?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim_start())
}

/// Scrub markdown noise out of a shell command
///
/// The first fenced block's content replaces the command when there is one.
/// Each line then loses one bullet marker and one prompt character, and the
/// whole is trimmed. Borrowed means nothing changed.
pub fn scrub_command(command: &str) -> Cow<'_, str> {
    let body = fence::fenced_blocks(command).first().map_or(command, |block| block.body);

    let scrubbed = body
        .lines()
        .map(|line| {
            let line = strip_bullet(line).unwrap_or(line);
            strip_prompt(line).unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let scrubbed = scrubbed.trim();
    if scrubbed == command {
        Cow::Borrowed(command)
    } else {
        Cow::Owned(scrubbed.to_owned())
    }
}

/// Scrub the `command` argument of a shell tool call
///
/// Calls to other tools, calls without a string `command`, and calls whose
/// string arguments fail to decode are returned borrowed.
pub fn clean_shell_call(call: &ToolCall) -> Cow<'_, ToolCall> {
    if !is_shell_tool(call.name()) {
        return Cow::Borrowed(call);
    }

    let updated = match call {
        ToolCall::Input(inner) => inner.input.as_object().and_then(scrubbed_arguments).map(|args| {
            let mut updated = inner.clone();
            updated.input = Value::Object(args);
            ToolCall::Input(updated)
        }),
        ToolCall::Function(inner) => match &inner.function.arguments {
            Value::Object(args) => scrubbed_arguments(args).map(Value::Object),
            Value::String(encoded) => serde_json::from_str::<Map<String, Value>>(encoded)
                .ok()
                .and_then(|args| scrubbed_arguments(&args))
                .and_then(|args| serde_json::to_string(&args).ok())
                .map(Value::String),
            _ => None,
        }
        .map(|arguments| {
            let mut updated = inner.clone();
            updated.function.arguments = arguments;
            ToolCall::Function(updated)
        }),
    };

    updated.map_or(Cow::Borrowed(call), Cow::Owned)
}

fn scrubbed_arguments(args: &Map<String, Value>) -> Option<Map<String, Value>> {
    let command = args.get("command")?.as_str()?;
    let Cow::Owned(clean) = scrub_command(command) else {
        return None;
    };

    let mut updated = args.clone();
    updated.insert("command".to_owned(), Value::String(clean));
    Some(updated)
}
