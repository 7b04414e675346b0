//! Bedrock `InvokeModel` bodies for the non-Anthropic model families
//!
//! Claude models take the Anthropic Messages body directly, so only the
//! other families need their own shapes. Every family has a different idea
//! of how to spell "max tokens".

use serde::{Deserialize, Serialize};

// -- Amazon Titan --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanRequest {
    pub input_text: String,
    pub text_generation_config: TitanGenerationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanGenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_token_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanResponse {
    #[serde(default)]
    pub input_text_token_count: u32,
    pub results: Vec<TitanResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanResult {
    #[serde(default)]
    pub token_count: u32,
    pub output_text: String,
    /// `FINISH` or `LENGTH`
    #[serde(default)]
    pub completion_reason: Option<String>,
}

// -- Meta Llama --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlamaRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gen_len: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlamaResponse {
    pub generation: String,
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub generation_token_count: u32,
    /// `stop` or `length`
    #[serde(default)]
    pub stop_reason: Option<String>,
}

// -- AI21 Jurassic --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurassicRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JurassicResponse {
    #[serde(default)]
    pub prompt: Option<JurassicPrompt>,
    pub completions: Vec<JurassicCompletion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JurassicPrompt {
    #[serde(default)]
    pub tokens: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurassicCompletion {
    pub data: JurassicData,
    #[serde(default)]
    pub finish_reason: Option<JurassicFinishReason>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JurassicData {
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JurassicFinishReason {
    /// `endoftext`, `length` or `stop`
    pub reason: String,
}

// -- Cohere Command --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohereRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling, named `p` by Cohere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereResponse {
    pub generations: Vec<CohereGeneration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereGeneration {
    pub text: String,
    /// `COMPLETE` or `MAX_TOKENS`
    #[serde(default)]
    pub finish_reason: Option<String>,
}

// -- Mistral --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MistralRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistralResponse {
    pub outputs: Vec<MistralOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistralOutput {
    pub text: String,
    /// `stop` or `length`
    #[serde(default)]
    pub stop_reason: Option<String>,
}
