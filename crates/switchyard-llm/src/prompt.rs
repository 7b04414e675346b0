//! Plain-text prompt rendering for completion-style models

use serde_json::json;

use crate::types::{Content, ContentBlock, Message, Role};

/// Render a conversation as `Human:`/`Assistant:` turns ending with an open
/// `Assistant:` turn
pub fn render_prompt(system: Option<&Content>, messages: &[Message]) -> String {
    let transcript = render_transcript(system, messages);
    if transcript.is_empty() {
        "Assistant:".to_owned()
    } else {
        format!("{transcript}\n\nAssistant:")
    }
}

/// Mistral instruction format around the rendered transcript
pub fn render_instruction(system: Option<&Content>, messages: &[Message]) -> String {
    format!("<s>[INST] {} [/INST]", render_transcript(system, messages))
}

/// System text first, then one paragraph per turn
pub fn render_transcript(system: Option<&Content>, messages: &[Message]) -> String {
    let mut system_parts: Vec<String> = system
        .map(Content::as_text)
        .filter(|text| !text.is_empty())
        .into_iter()
        .collect();
    let mut turns = Vec::with_capacity(messages.len());

    for message in messages {
        let text = message_text(message);
        match message.role {
            Role::System => system_parts.push(text),
            Role::Assistant => turns.push(format!("Assistant: {text}")),
            Role::User | Role::Tool => turns.push(format!("Human: {text}")),
        }
    }

    system_parts.into_iter().chain(turns).collect::<Vec<_>>().join("\n\n")
}

fn message_text(message: &Message) -> String {
    let mut parts = Vec::new();

    match &message.content {
        Content::Text(text) if text.is_empty() => {}
        Content::Text(text) => parts.push(text.clone()),
        Content::Blocks(blocks) => parts.extend(blocks.iter().map(block_text)),
    }

    if let Some(calls) = &message.tool_calls {
        parts.extend(calls.iter().map(|call| {
            let arguments =
                serde_json::from_str(&call.function.arguments).unwrap_or_else(|_| json!(call.function.arguments));
            json!({ "name": call.function.name, "parameters": arguments }).to_string()
        }));
    }

    let text = parts.join("\n");
    if message.tool_call_id.is_some() {
        format!("Tool result: {text}")
    } else {
        text
    }
}

fn block_text(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Text { text } => text.clone(),
        // Same shape the generic parser recovers from plain output
        ContentBlock::ToolUse { name, input, .. } => json!({ "name": name, "parameters": input }).to_string(),
        ContentBlock::ToolResult { content, .. } => format!("Tool result: {}", content.as_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolResultContent;

    #[test]
    fn renders_system_first_and_ends_open() {
        let messages = vec![
            Message::text(Role::User, "hi"),
            Message::text(Role::Assistant, "hello"),
            Message::text(Role::User, "bye"),
        ];

        let prompt = render_prompt(Some(&Content::from("Be brief.")), &messages);

        assert_eq!(prompt, "Be brief.\n\nHuman: hi\n\nAssistant: hello\n\nHuman: bye\n\nAssistant:");
    }

    #[test]
    fn instruction_wraps_transcript() {
        let prompt = render_instruction(None, &[Message::text(Role::User, "hi")]);
        assert_eq!(prompt, "<s>[INST] Human: hi [/INST]");
    }

    #[test]
    fn tool_blocks_are_rendered_as_text() {
        let messages = vec![
            Message::blocks(
                Role::Assistant,
                vec![ContentBlock::ToolUse {
                    id: "t1".to_owned(),
                    name: "Bash".to_owned(),
                    input: json!({ "command": "ls" }),
                }],
            ),
            Message::blocks(
                Role::User,
                vec![ContentBlock::ToolResult {
                    tool_use_id: "t1".to_owned(),
                    content: ToolResultContent::Text("Cargo.toml".to_owned()),
                    is_error: None,
                }],
            ),
        ];

        let prompt = render_transcript(None, &messages);

        assert_eq!(
            prompt,
            "Assistant: {\"name\":\"Bash\",\"parameters\":{\"command\":\"ls\"}}\n\nHuman: Tool result: Cargo.toml"
        );
    }
}
