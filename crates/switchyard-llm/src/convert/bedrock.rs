//! Canonical ⇄ Bedrock `InvokeModel` bodies

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::LlmError;
use crate::family::ModelFamily;
use crate::prompt::{render_instruction, render_prompt};
use crate::protocol::bedrock::{
    CohereRequest, CohereResponse, JurassicRequest, JurassicResponse, LlamaRequest, LlamaResponse, MistralRequest,
    MistralResponse, TitanGenerationConfig, TitanRequest, TitanResponse,
};
use crate::types::{CompletionRequest, CompletionResponse, ContentBlock, StopReason, Usage};

/// Messages API version Bedrock expects in Claude bodies
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Regional runtime endpoint
pub fn regional_endpoint(region: &str) -> Result<Url, LlmError> {
    Ok(Url::parse(&format!("https://bedrock-runtime.{region}.amazonaws.com"))?)
}

/// `InvokeModel` target for a model behind `endpoint`
///
/// The model ID is a single path segment, so the `/` in an ARN is escaped.
pub fn invoke_url(endpoint: &Url, model: &str) -> Result<Url, LlmError> {
    let mut url = endpoint.clone();

    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push("model")
        .push(model)
        .push("invoke");

    Ok(url)
}

// -- Outbound --

/// Request body for a model of the given family
pub fn encode_request(family: ModelFamily, request: &CompletionRequest) -> Result<Value, LlmError> {
    let stops = request.stop_sequences.clone().unwrap_or_default();

    match family {
        ModelFamily::Claude => claude_body(request),
        ModelFamily::Titan => to_body(&TitanRequest {
            input_text: render_prompt(request.system.as_ref(), &request.messages),
            text_generation_config: TitanGenerationConfig {
                max_token_count: request.max_tokens,
                temperature: request.temperature,
                top_p: request.top_p,
                stop_sequences: stops,
            },
        }),
        ModelFamily::Llama => to_body(&LlamaRequest {
            prompt: render_prompt(request.system.as_ref(), &request.messages),
            max_gen_len: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
        }),
        ModelFamily::Jurassic => to_body(&JurassicRequest {
            prompt: render_prompt(request.system.as_ref(), &request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stop_sequences: stops,
        }),
        ModelFamily::Cohere => to_body(&CohereRequest {
            prompt: render_prompt(request.system.as_ref(), &request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            p: request.top_p,
            stop_sequences: stops,
        }),
        ModelFamily::Mistral => to_body(&MistralRequest {
            prompt: render_instruction(request.system.as_ref(), &request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stop: stops,
        }),
    }
}

/// The canonical body itself, minus the fields Bedrock takes from the URL
fn claude_body(request: &CompletionRequest) -> Result<Value, LlmError> {
    let mut body = to_body(request)?;
    if let Value::Object(fields) = &mut body {
        fields.remove("model");
        fields.remove("stream");
        fields.insert("anthropic_version".to_owned(), Value::String(ANTHROPIC_VERSION.to_owned()));
    }
    Ok(body)
}

fn to_body<T: Serialize>(body: &T) -> Result<Value, LlmError> {
    serde_json::to_value(body).map_err(|e| LlmError::InvalidRequest(e.to_string()))
}

// -- Inbound --

/// Canonical response from a family's response body
pub fn decode_response(family: ModelFamily, body: Value, model: &str) -> Result<CompletionResponse, LlmError> {
    let (text, reason, usage) = match family {
        ModelFamily::Claude => return parse(body),
        ModelFamily::Titan => {
            let response: TitanResponse = parse(body)?;
            let result = first(response.results)?;
            let usage = Usage {
                input_tokens: response.input_text_token_count,
                output_tokens: result.token_count,
            };
            (result.output_text, result.completion_reason, usage)
        }
        ModelFamily::Llama => {
            let response: LlamaResponse = parse(body)?;
            let usage = Usage {
                input_tokens: response.prompt_token_count,
                output_tokens: response.generation_token_count,
            };
            (response.generation, response.stop_reason, usage)
        }
        ModelFamily::Jurassic => {
            let response: JurassicResponse = parse(body)?;
            let prompt_tokens = response.prompt.map_or(0, |p| p.tokens.len());
            let completion = first(response.completions)?;
            let usage = Usage {
                input_tokens: saturate(prompt_tokens),
                output_tokens: saturate(completion.data.tokens.len()),
            };
            (completion.data.text, completion.finish_reason.map(|f| f.reason), usage)
        }
        ModelFamily::Cohere => {
            let response: CohereResponse = parse(body)?;
            let generation = first(response.generations)?;
            (generation.text, generation.finish_reason, Usage::default())
        }
        ModelFamily::Mistral => {
            let response: MistralResponse = parse(body)?;
            let output = first(response.outputs)?;
            (output.text, output.stop_reason, Usage::default())
        }
    };

    let mut response = CompletionResponse::assistant(model, vec![ContentBlock::Text { text }]);
    response.stop_reason = Some(stop_reason(reason.as_deref()));
    response.usage = usage;
    Ok(response)
}

fn parse<T: DeserializeOwned>(body: Value) -> Result<T, LlmError> {
    serde_json::from_value(body).map_err(|source| LlmError::InvalidResponse {
        format: "bedrock",
        source,
    })
}

fn first<T>(items: Vec<T>) -> Result<T, LlmError> {
    items
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse { format: "bedrock" })
}

fn saturate(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Length cut-offs map to `max_tokens`, anything else ends the turn
fn stop_reason(reason: Option<&str>) -> StopReason {
    match reason.map(str::to_ascii_lowercase).as_deref() {
        Some("length" | "max_tokens") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{Content, Message, Role};

    fn request() -> CompletionRequest {
        let mut request = CompletionRequest::new("claude-sonnet-4-5", vec![Message::text(Role::User, "hi")]);
        request.system = Some(Content::from("Be brief."));
        request.max_tokens = Some(256);
        request.temperature = Some(0.5);
        request.top_p = Some(0.9);
        request.stop_sequences = Some(vec!["END".to_owned()]);
        request.stream = Some(true);
        request
    }

    const PROMPT: &str = "Be brief.\n\nHuman: hi\n\nAssistant:";

    #[test]
    fn invoke_url_from_region_and_model() {
        let endpoint = regional_endpoint("us-east-1").unwrap();
        let url = invoke_url(&endpoint, "us.anthropic.claude-sonnet-4-5-20250929-v1:0").unwrap();

        assert_eq!(
            url.as_str(),
            "https://bedrock-runtime.us-east-1.amazonaws.com/model/us.anthropic.claude-sonnet-4-5-20250929-v1:0/invoke"
        );
    }

    #[test]
    fn invoke_url_escapes_arn_model_ids() {
        let endpoint = regional_endpoint("us-east-1").unwrap();
        let url = invoke_url(
            &endpoint,
            "arn:aws:bedrock:us-east-1::foundation-model/anthropic.claude-3-haiku-20240307-v1:0",
        )
        .unwrap();

        assert_eq!(
            url.path(),
            "/model/arn:aws:bedrock:us-east-1::foundation-model%2Fanthropic.claude-3-haiku-20240307-v1:0/invoke"
        );
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn invoke_url_keeps_endpoint_path_prefix() {
        let endpoint = Url::parse("https://proxy.internal/bedrock/").unwrap();
        let url = invoke_url(&endpoint, "meta.llama3-8b-instruct-v1:0").unwrap();

        assert_eq!(url.as_str(), "https://proxy.internal/bedrock/model/meta.llama3-8b-instruct-v1:0/invoke");
    }

    #[test]
    fn claude_body_is_canonical_without_model_or_stream() {
        let body = encode_request(ModelFamily::Claude, &request()).unwrap();

        assert_eq!(
            body,
            json!({
                "anthropic_version": ANTHROPIC_VERSION,
                "system": "Be brief.",
                "messages": [{ "role": "user", "content": "hi" }],
                "max_tokens": 256,
                "temperature": 0.5,
                "top_p": 0.9,
                "stop_sequences": ["END"]
            })
        );
    }

    #[test]
    fn titan_body() {
        let body = encode_request(ModelFamily::Titan, &request()).unwrap();

        assert_eq!(
            body,
            json!({
                "inputText": PROMPT,
                "textGenerationConfig": { "maxTokenCount": 256, "temperature": 0.5, "topP": 0.9, "stopSequences": ["END"] }
            })
        );
    }

    #[test]
    fn llama_body() {
        let body = encode_request(ModelFamily::Llama, &request()).unwrap();
        assert_eq!(
            body,
            json!({ "prompt": PROMPT, "max_gen_len": 256, "temperature": 0.5, "top_p": 0.9 })
        );
    }

    #[test]
    fn jurassic_and_cohere_bodies() {
        let jurassic = encode_request(ModelFamily::Jurassic, &request()).unwrap();
        assert_eq!(
            jurassic,
            json!({ "prompt": PROMPT, "maxTokens": 256, "temperature": 0.5, "topP": 0.9, "stopSequences": ["END"] })
        );

        let cohere = encode_request(ModelFamily::Cohere, &request()).unwrap();
        assert_eq!(
            cohere,
            json!({ "prompt": PROMPT, "max_tokens": 256, "temperature": 0.5, "p": 0.9, "stop_sequences": ["END"] })
        );
    }

    #[test]
    fn mistral_body_uses_instruction_format() {
        let body = encode_request(ModelFamily::Mistral, &request()).unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": "<s>[INST] Be brief.\n\nHuman: hi [/INST]",
                "max_tokens": 256,
                "temperature": 0.5,
                "top_p": 0.9,
                "stop": ["END"]
            })
        );
    }

    #[test]
    fn decodes_titan_and_llama() {
        let titan = decode_response(
            ModelFamily::Titan,
            json!({ "inputTextTokenCount": 7, "results": [{ "tokenCount": 3, "outputText": "hello", "completionReason": "LENGTH" }] }),
            "amazon.titan-text-express-v1",
        )
        .unwrap();
        assert_eq!(titan.text(), "hello");
        assert_eq!(titan.stop_reason, Some(StopReason::MaxTokens));
        assert_eq!(titan.usage, Usage { input_tokens: 7, output_tokens: 3 });
        assert!(titan.id.starts_with("msg_"));

        let llama = decode_response(
            ModelFamily::Llama,
            json!({ "generation": "hi", "prompt_token_count": 4, "generation_token_count": 1, "stop_reason": "stop" }),
            "meta.llama3-8b-instruct-v1:0",
        )
        .unwrap();
        assert_eq!(llama.content, vec![ContentBlock::text("hi")]);
        assert_eq!(llama.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(llama.model, "meta.llama3-8b-instruct-v1:0");
    }

    #[test]
    fn decodes_jurassic_cohere_and_mistral() {
        let jurassic = decode_response(
            ModelFamily::Jurassic,
            json!({
                "prompt": { "tokens": [{}, {}] },
                "completions": [{ "data": { "text": "j2", "tokens": [{}] }, "finishReason": { "reason": "endoftext" } }]
            }),
            "ai21.j2-ultra-v1",
        )
        .unwrap();
        assert_eq!(jurassic.text(), "j2");
        assert_eq!(jurassic.usage, Usage { input_tokens: 2, output_tokens: 1 });

        let cohere = decode_response(
            ModelFamily::Cohere,
            json!({ "generations": [{ "text": "co", "finish_reason": "MAX_TOKENS" }] }),
            "cohere.command-text-v14",
        )
        .unwrap();
        assert_eq!(cohere.stop_reason, Some(StopReason::MaxTokens));

        let mistral = decode_response(
            ModelFamily::Mistral,
            json!({ "outputs": [{ "text": "mi", "stop_reason": "something_new" }] }),
            "mistral.mistral-7b-instruct-v0:2",
        )
        .unwrap();
        assert_eq!(mistral.stop_reason, Some(StopReason::EndTurn));
    }

    #[test]
    fn decodes_claude_as_canonical() {
        let response = decode_response(
            ModelFamily::Claude,
            json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "model": "claude-sonnet-4-5",
                "content": [{ "type": "text", "text": "hello" }],
                "stop_reason": "end_turn",
                "usage": { "input_tokens": 3, "output_tokens": 1 }
            }),
            "us.anthropic.claude-sonnet-4-5-20250929-v1:0",
        )
        .unwrap();

        assert_eq!(response.id, "msg_01");
        assert_eq!(response.text(), "hello");
    }

    #[test]
    fn empty_and_malformed_bodies_are_errors() {
        assert!(matches!(
            decode_response(ModelFamily::Cohere, json!({ "generations": [] }), "cohere.command-text-v14"),
            Err(LlmError::EmptyResponse { format: "bedrock" })
        ));
        assert!(matches!(
            decode_response(ModelFamily::Llama, json!({ "nope": true }), "meta.llama3-8b-instruct-v1:0"),
            Err(LlmError::InvalidResponse { .. })
        ));
    }
}
