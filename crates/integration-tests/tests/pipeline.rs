mod harness;

use harness::config::ConfigBuilder;
use harness::upstream::{anthropic_text, openai_text, request};
use serde_json::json;
use switchyard_config::{ParserVariantName, ProviderKind};
use switchyard_llm::protocol::openai::OpenAiRequest;
use switchyard_llm::types::{CompletionRequest, ContentBlock, Message, Role, StopReason, ToolResultContent};
use switchyard_llm::{Gateway, LlmError, ModelFamily, WireFormat};

#[tokio::test]
async fn glm_prose_tool_call_becomes_tool_use() {
    let config = ConfigBuilder::new()
        .with_local_provider("local", ProviderKind::Llamacpp, Some("GLM-4.7-Flash-Q4_K_M"))
        .build();
    let gateway = Gateway::from_config(&config).unwrap();

    let upstream = gateway.prepare(request("show me the files", 1)).await.unwrap();
    assert_eq!(upstream.format, WireFormat::OpenAi);

    let text = "<tool_call>Bash\n<arg_key>command</arg_key>\n<arg_value>ls -la</arg_value>\n</tool_call>";
    let response = gateway.finish(&upstream, openai_text("GLM-4.7-Flash-Q4_K_M", text)).unwrap();

    assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
    let [ContentBlock::ToolUse { id, name, input }] = response.content.as_slice() else {
        panic!("expected a single tool_use block, got {:?}", response.content);
    };
    assert!(id.starts_with("toolu_"));
    assert_eq!(name, "Bash");
    assert_eq!(input, &json!({ "command": "ls -la" }));
    assert_eq!(gateway.parsers().cached(), 1);
}

#[tokio::test]
async fn generic_json_in_prose_is_recovered_for_text_only_backends() {
    let config = ConfigBuilder::new()
        .with_local_provider("local", ProviderKind::Llamacpp, Some("mistral-7b-instruct"))
        .build();
    let gateway = Gateway::from_config(&config).unwrap();
    let upstream = gateway.prepare(request("run the tests", 1)).await.unwrap();

    let text = r#"I'll run them. {"name": "Bash", "parameters": {"command": "cargo test"}}"#;
    let response = gateway.finish(&upstream, openai_text("mistral-7b-instruct", text)).unwrap();

    assert!(response.has_tool_use());
    assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
}

#[tokio::test]
async fn native_providers_keep_prose_as_text() {
    let config = ConfigBuilder::new().with_anthropic_provider("cloud").build();
    let gateway = Gateway::from_config(&config).unwrap();
    let upstream = gateway.prepare(request("explain tool calls", 1)).await.unwrap();

    let text = r#"A call looks like {"name": "Bash", "parameters": {"command": "ls"}}"#;
    let response = gateway.finish(&upstream, anthropic_text("claude-sonnet-4-5", text)).unwrap();

    assert!(!response.has_tool_use());
    assert_eq!(response.text(), text);
}

#[tokio::test]
async fn reasoning_blocks_are_stripped_from_answers() {
    let config = ConfigBuilder::new()
        .with_local_provider("local", ProviderKind::Ollama, Some("qwen3:8b"))
        .build();
    let gateway = Gateway::from_config(&config).unwrap();
    let upstream = gateway.prepare(request("hi", 0)).await.unwrap();

    let response = gateway
        .finish(&upstream, openai_text("qwen3:8b", "<think>greet back</think>\nHello!"))
        .unwrap();

    assert_eq!(response.text(), "Hello!");
}

#[tokio::test]
async fn tool_turns_survive_translation_to_openai() {
    let config = ConfigBuilder::new()
        .with_openai_provider("openai", "https://api.openai.com/v1")
        .build();
    let gateway = Gateway::from_config(&config).unwrap();

    let n = 3;
    let mut req = request("inspect the repo", 1);
    req.messages.push(Message::blocks(
        Role::Assistant,
        (0..n)
            .map(|i| ContentBlock::ToolUse {
                id: format!("toolu_{i}"),
                name: "Bash".to_owned(),
                input: json!({ "command": format!("cmd {i}") }),
            })
            .collect(),
    ));
    req.messages.push(Message::blocks(
        Role::User,
        (0..n)
            .map(|i| ContentBlock::ToolResult {
                tool_use_id: format!("toolu_{i}"),
                content: ToolResultContent::Text(format!("out {i}")),
                is_error: None,
            })
            .collect(),
    ));

    let upstream = gateway.prepare(req).await.unwrap();
    let messages = upstream.body["messages"].as_array().unwrap();

    let calls = messages[1]["tool_calls"].as_array().unwrap();
    assert_eq!(calls.len(), n);
    assert_eq!(calls[1]["function"]["arguments"], r#"{"command":"cmd 1"}"#);
    let tool_turns: Vec<_> = messages.iter().filter(|m| m["role"] == "tool").collect();
    assert_eq!(tool_turns.len(), n);
    assert_eq!(tool_turns[2]["tool_call_id"], "toolu_2");
    assert_eq!(tool_turns[2]["content"], "out 2");
}

#[tokio::test]
async fn tool_turns_keep_order_across_several_exchanges() {
    let config = ConfigBuilder::new()
        .with_openai_provider("openai", "https://api.openai.com/v1")
        .build();
    let gateway = Gateway::from_config(&config).unwrap();

    let use_block = |id: &str| ContentBlock::ToolUse {
        id: id.to_owned(),
        name: "Bash".to_owned(),
        input: json!({ "command": format!("run {id}") }),
    };
    let result_block = |id: &str| ContentBlock::ToolResult {
        tool_use_id: id.to_owned(),
        content: ToolResultContent::Text(format!("out {id}")),
        is_error: None,
    };

    let mut req = request("inspect the repo", 1);
    req.messages.extend([
        Message::blocks(Role::Assistant, vec![use_block("a0"), use_block("a1")]),
        Message::blocks(
            Role::User,
            vec![result_block("a0"), result_block("a1"), ContentBlock::text("keep going")],
        ),
        Message::blocks(Role::Assistant, vec![ContentBlock::text("One more."), use_block("b0")]),
        Message::blocks(Role::User, vec![result_block("b0")]),
    ]);

    let upstream = gateway.prepare(req).await.unwrap();
    let messages = upstream.body["messages"].as_array().unwrap();

    let roles: Vec<_> = messages.iter().map(|m| m["role"].as_str().unwrap()).collect();
    assert_eq!(roles, ["user", "assistant", "tool", "tool", "user", "assistant", "tool"]);

    assert_eq!(messages[1]["tool_calls"][0]["id"], "a0");
    assert_eq!(messages[1]["tool_calls"][1]["id"], "a1");
    assert_eq!(messages[1]["tool_calls"][1]["function"]["arguments"], r#"{"command":"run a1"}"#);
    assert_eq!(messages[5]["content"], "One more.");
    assert_eq!(messages[5]["tool_calls"].as_array().unwrap().len(), 1);
    assert_eq!(messages[5]["tool_calls"][0]["id"], "b0");

    for (index, id) in [(2, "a0"), (3, "a1"), (6, "b0")] {
        assert_eq!(messages[index]["tool_call_id"], id);
        assert_eq!(messages[index]["content"], format!("out {id}"));
    }
    assert_eq!(messages[4]["content"], "keep going");
}

#[tokio::test]
async fn openai_inbound_requests_round_trip_through_canonical() {
    let raw: OpenAiRequest = serde_json::from_value(json!({
        "model": "gpt-4o",
        "messages": [
            { "role": "system", "content": "Be terse." },
            { "role": "user", "content": "where am I?" },
            { "role": "assistant", "content": null, "tool_calls": [
                { "id": "call_1", "type": "function", "function": { "name": "Bash", "arguments": "{\"command\":\"pwd\"}" } }
            ] },
            { "role": "tool", "tool_call_id": "call_1", "content": "/home" }
        ],
        "tools": [{ "type": "function", "function": { "name": "Bash", "parameters": { "type": "object" } } }]
    }))
    .unwrap();
    let request = CompletionRequest::from(raw);

    let config = ConfigBuilder::new()
        .with_openai_provider("openai", "https://api.openai.com/v1")
        .build();
    let gateway = Gateway::from_config(&config).unwrap();
    let upstream = gateway.prepare(request).await.unwrap();

    assert_eq!(
        upstream.body["messages"],
        json!([
            { "role": "system", "content": "Be terse." },
            { "role": "user", "content": "where am I?" },
            { "role": "assistant", "tool_calls": [
                { "id": "call_1", "type": "function", "function": { "name": "Bash", "arguments": "{\"command\":\"pwd\"}" } }
            ] },
            { "role": "tool", "tool_call_id": "call_1", "content": "/home" }
        ])
    );
}

#[tokio::test]
async fn bedrock_titan_round_trip() {
    let config = ConfigBuilder::new()
        .with_bedrock_provider("bedrock", "us-west-2", "amazon.titan-text-premier-v1:0")
        .build();
    let gateway = Gateway::from_config(&config).unwrap();

    let upstream = gateway.prepare(request("hello", 0)).await.unwrap();
    assert_eq!(upstream.family, Some(ModelFamily::Titan));
    assert_eq!(
        upstream.url.as_str(),
        "https://bedrock-runtime.us-west-2.amazonaws.com/model/amazon.titan-text-premier-v1:0/invoke"
    );
    assert_eq!(upstream.body["inputText"], "Human: hello\n\nAssistant:");
    assert_eq!(upstream.body["textGenerationConfig"]["maxTokenCount"], 1024);

    let response = gateway
        .finish(
            &upstream,
            json!({ "inputTextTokenCount": 5, "results": [{ "tokenCount": 2, "outputText": "Hi there", "completionReason": "FINISH" }] }),
        )
        .unwrap();

    assert_eq!(response.text(), "Hi there");
    assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    assert_eq!(response.usage.output_tokens, 2);
}

#[test]
fn unknown_bedrock_default_model_is_rejected_at_startup() {
    let config = ConfigBuilder::new()
        .with_bedrock_provider("bedrock", "us-east-1", "unknown.model-v1")
        .build();

    let err = Gateway::from_config(&config).unwrap_err();

    assert!(matches!(err, LlmError::UnsupportedModel { ref model } if model == "unknown.model-v1"));
}

#[test]
fn configured_parser_entries_win() {
    let config = ConfigBuilder::new()
        .with_local_provider("local", ProviderKind::Ollama, Some("qwen3:8b"))
        .with_parser_entry("qwen3:8b", ParserVariantName::Generic)
        .build();
    let gateway = Gateway::from_config(&config).unwrap();

    assert_eq!(
        gateway.parsers().variant_for("QWEN3:8B"),
        switchyard_parsers::ParserVariant::Generic
    );
    assert_eq!(
        gateway.parsers().variant_for("qwen3-coder:30b"),
        switchyard_parsers::ParserVariant::GlmFamily
    );
}
