//! Canned requests and upstream response bodies

use serde_json::{Value, json};
use switchyard_llm::types::{CompletionRequest, Message, Role, ToolDefinition};

/// Canonical request asking `prompt` with `tools` tool definitions
pub fn request(prompt: &str, tools: usize) -> CompletionRequest {
    let mut request = CompletionRequest::new("claude-sonnet-4-5", vec![Message::text(Role::User, prompt)]);
    request.max_tokens = Some(1024);
    if tools > 0 {
        request.tools = Some((0..tools).map(tool).collect());
    }
    request
}

fn tool(index: usize) -> ToolDefinition {
    let name = if index == 0 { "Bash".to_owned() } else { format!("tool_{index}") };
    ToolDefinition {
        name,
        description: None,
        input_schema: json!({ "type": "object", "properties": { "command": { "type": "string" } } }),
    }
}

/// Chat completions body answering with plain text
pub fn openai_text(model: &str, text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": text }, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 20, "completion_tokens": 10, "total_tokens": 30 }
    })
}

/// Messages API body answering with one text block
pub fn anthropic_text(model: &str, text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": model,
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 20, "output_tokens": 10 }
    })
}
