//! Canonical ⇄ `OpenAI` chat completions

use serde_json::{Value, json};

use crate::error::LlmError;
use crate::protocol::openai::{
    OpenAiContent, OpenAiContentPart, OpenAiFunction, OpenAiFunctionCall, OpenAiMessage, OpenAiRequest,
    OpenAiResponse, OpenAiTool, OpenAiToolCall, function_type,
};
use crate::types::{
    CompletionRequest, CompletionResponse, Content, ContentBlock, FunctionCall, Message, Role, StopReason, ToolCall,
    ToolDefinition, ToolResultContent, Usage,
};

// -- Outbound: canonical -> OpenAI wire format --

/// Build an `OpenAI` request body for `model`
pub fn request_to_openai(request: &CompletionRequest, model: &str) -> OpenAiRequest {
    OpenAiRequest {
        model: model.to_owned(),
        messages: messages_to_openai(request.system.as_ref(), &request.messages),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        top_p: request.top_p,
        stop: request.stop_sequences.clone(),
        stream: request.stream,
        tools: request
            .tools
            .as_ref()
            .map(|tools| tools.iter().map(OpenAiTool::from).collect()),
        tool_choice: request.tool_choice.as_ref().map(tool_choice_to_openai),
    }
}

/// Flatten canonical messages into `OpenAI` turns
///
/// `tool_use` blocks become entries in the assistant's `tool_calls`.
/// `tool_result` blocks each become a standalone `tool` turn, emitted before
/// the text that shared their message. `tool` turns have no error flag, so
/// `is_error` is dropped and the result content is sent unchanged.
pub fn messages_to_openai(system: Option<&Content>, messages: &[Message]) -> Vec<OpenAiMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);

    if let Some(system) = system {
        out.push(OpenAiMessage::text("system", system.as_text()));
    }

    for message in messages {
        if message.is_openai_shaped() {
            out.push(passthrough(message));
            continue;
        }

        match &message.content {
            Content::Text(text) => out.push(OpenAiMessage::text(message.role.as_ref(), text.clone())),
            Content::Blocks(blocks) => push_blocks(message.role, blocks, &mut out),
        }
    }

    out
}

fn push_blocks(role: Role, blocks: &[ContentBlock], out: &mut Vec<OpenAiMessage>) {
    let start = out.len();
    let mut text = Vec::new();
    let mut calls = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Text { text: t } => text.push(t.as_str()),
            ContentBlock::ToolUse { id, name, input } => calls.push(OpenAiToolCall {
                id: id.clone(),
                tool_type: function_type(),
                function: OpenAiFunctionCall {
                    name: name.clone(),
                    arguments: arguments_string(input),
                },
            }),
            ContentBlock::ToolResult {
                tool_use_id, content, ..
            } => out.push(OpenAiMessage {
                role: "tool".to_owned(),
                content: Some(result_content(content)),
                tool_calls: None,
                tool_call_id: Some(tool_use_id.clone()),
            }),
        }
    }

    let text = text.join("\n");
    if role == Role::Assistant || !calls.is_empty() {
        if !text.is_empty() || !calls.is_empty() {
            out.push(OpenAiMessage {
                role: Role::Assistant.as_ref().to_owned(),
                content: (!text.is_empty()).then_some(OpenAiContent::Text(text)),
                tool_calls: (!calls.is_empty()).then_some(calls),
                tool_call_id: None,
            });
        }
    } else if !text.is_empty() {
        out.push(OpenAiMessage::text(role.as_ref(), text));
    }

    // Keep the turn even when it had nothing to say
    if out.len() == start {
        out.push(OpenAiMessage::text(role.as_ref(), String::new()));
    }
}

fn passthrough(message: &Message) -> OpenAiMessage {
    let content = match &message.content {
        Content::Text(text) if text.is_empty() && message.tool_calls.is_some() => None,
        Content::Text(text) => Some(OpenAiContent::Text(text.clone())),
        Content::Blocks(_) => Some(OpenAiContent::Text(message.content.as_text())),
    };

    OpenAiMessage {
        role: message.role.as_ref().to_owned(),
        content,
        tool_calls: message
            .tool_calls
            .as_ref()
            .map(|calls| calls.iter().map(OpenAiToolCall::from).collect()),
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn result_content(content: &ToolResultContent) -> OpenAiContent {
    match content {
        ToolResultContent::Text(text) => OpenAiContent::Text(text.clone()),
        ToolResultContent::Blocks(blocks) => OpenAiContent::Parts(
            blocks
                .iter()
                .filter_map(ContentBlock::as_text)
                .map(|text| OpenAiContentPart::Text { text: text.to_owned() })
                .collect(),
        ),
    }
}

/// Arguments as the JSON string `OpenAI` expects
fn arguments_string(input: &Value) -> String {
    match input {
        // Arguments that never parsed are kept verbatim
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

fn tool_choice_to_openai(choice: &Value) -> Value {
    match choice.get("type").and_then(Value::as_str) {
        Some("auto") => json!("auto"),
        Some("any") => json!("required"),
        Some("none") => json!("none"),
        Some("tool") => json!({
            "type": "function",
            "function": { "name": choice.get("name").cloned().unwrap_or(Value::Null) }
        }),
        _ => choice.clone(),
    }
}

impl From<&ToolDefinition> for OpenAiTool {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            tool_type: function_type(),
            function: OpenAiFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: (!tool.input_schema.is_null()).then(|| tool.input_schema.clone()),
            },
        }
    }
}

impl From<&ToolCall> for OpenAiToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            tool_type: call.kind.clone(),
            function: OpenAiFunctionCall {
                name: call.function.name.clone(),
                arguments: call.function.arguments.clone(),
            },
        }
    }
}

// -- Inbound: OpenAI wire format -> canonical --

impl From<OpenAiRequest> for CompletionRequest {
    fn from(request: OpenAiRequest) -> Self {
        let (system, messages) = messages_from_openai(request.messages);

        let mut canonical = Self::new(request.model, messages);
        canonical.system = system;
        canonical.max_tokens = request.max_tokens;
        canonical.temperature = request.temperature;
        canonical.top_p = request.top_p;
        canonical.stop_sequences = request.stop;
        canonical.stream = request.stream;
        canonical.tools = request
            .tools
            .map(|tools| tools.into_iter().map(ToolDefinition::from).collect());
        canonical.tool_choice = request.tool_choice.as_ref().map(tool_choice_from_openai);
        canonical
    }
}

/// Fold `OpenAI` turns back into canonical messages
///
/// System turns are lifted out. Assistant `tool_calls` become `tool_use`
/// blocks and each run of consecutive `tool` turns becomes one user turn of
/// `tool_result` blocks.
pub fn messages_from_openai(messages: Vec<OpenAiMessage>) -> (Option<Content>, Vec<Message>) {
    let mut system = Vec::new();
    let mut out = Vec::with_capacity(messages.len());
    let mut results = Vec::new();

    for message in messages {
        if message.role == "tool" {
            results.push(ContentBlock::ToolResult {
                tool_use_id: message.tool_call_id.unwrap_or_default(),
                content: ToolResultContent::Text(message.content.as_ref().map(OpenAiContent::as_text).unwrap_or_default()),
                is_error: None,
            });
            continue;
        }

        if !results.is_empty() {
            out.push(Message::blocks(Role::User, std::mem::take(&mut results)));
        }

        let text = message.content.as_ref().map(OpenAiContent::as_text).unwrap_or_default();
        match message.role.as_str() {
            "system" | "developer" => system.push(text),
            "assistant" => out.push(assistant_from_openai(text, message.tool_calls.unwrap_or_default())),
            _ => out.push(Message::text(Role::User, text)),
        }
    }

    if !results.is_empty() {
        out.push(Message::blocks(Role::User, results));
    }

    let system = (!system.is_empty()).then(|| Content::Text(system.join("\n\n")));
    (system, out)
}

fn assistant_from_openai(text: String, calls: Vec<OpenAiToolCall>) -> Message {
    if calls.is_empty() {
        return Message::text(Role::Assistant, text);
    }

    let mut blocks = Vec::with_capacity(calls.len() + 1);
    if !text.is_empty() {
        blocks.push(ContentBlock::Text { text });
    }
    blocks.extend(calls.into_iter().map(tool_use_from_openai));
    Message::blocks(Role::Assistant, blocks)
}

fn tool_use_from_openai(call: OpenAiToolCall) -> ContentBlock {
    let input = serde_json::from_str(&call.function.arguments).unwrap_or(Value::String(call.function.arguments));
    ContentBlock::ToolUse {
        id: call.id,
        name: call.function.name,
        input,
    }
}

fn tool_choice_from_openai(choice: &Value) -> Value {
    match choice {
        Value::String(mode) if mode == "required" => json!({ "type": "any" }),
        Value::String(mode) => json!({ "type": mode }),
        other => match other.pointer("/function/name") {
            Some(name) => json!({ "type": "tool", "name": name }),
            None => other.clone(),
        },
    }
}

impl From<OpenAiTool> for ToolDefinition {
    fn from(tool: OpenAiTool) -> Self {
        Self {
            name: tool.function.name,
            description: tool.function.description,
            input_schema: tool.function.parameters.unwrap_or_else(|| json!({ "type": "object" })),
        }
    }
}

impl From<OpenAiToolCall> for ToolCall {
    fn from(call: OpenAiToolCall) -> Self {
        Self {
            id: call.id,
            kind: call.tool_type,
            function: FunctionCall {
                name: call.function.name,
                arguments: call.function.arguments,
            },
        }
    }
}

/// Canonical response from a chat completions response
///
/// `fallback_model` names the response when the upstream left `model` empty.
pub fn response_from_openai(response: OpenAiResponse, fallback_model: &str) -> Result<CompletionResponse, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse { format: "openai" })?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
        content.push(ContentBlock::Text { text });
    }
    content.extend(
        choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(tool_use_from_openai),
    );

    let model = if response.model.is_empty() {
        fallback_model.to_owned()
    } else {
        response.model
    };

    let mut canonical = CompletionResponse::assistant(model, content);
    if !response.id.is_empty() {
        canonical.id = response.id;
    }
    canonical.stop_reason = Some(stop_reason(choice.finish_reason.as_deref()));
    if let Some(usage) = response.usage {
        canonical.usage = Usage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        };
    }
    Ok(canonical)
}

fn stop_reason(finish_reason: Option<&str>) -> StopReason {
    match finish_reason {
        Some("length") => StopReason::MaxTokens,
        Some("tool_calls" | "function_call") => StopReason::ToolUse,
        _ => StopReason::EndTurn,
    }
}
