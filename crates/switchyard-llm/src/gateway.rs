//! Request preparation and response finishing for one gateway hop
//!
//! [`Gateway::prepare`] routes a canonical request and translates it for
//! the chosen provider. [`Gateway::finish`] translates the upstream answer
//! back and, for models that describe tool calls in prose, recovers them.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use switchyard_config::{Config, ParserVariantName, ParsersConfig};
use switchyard_parsers::{InputCall, ParserRegistry, ParserVariant, RegistryEntry, ToolCall as ParsedCall};
use switchyard_routing::{ComplexityClassifier, Router, RoutingDecision, TierTargets};
use url::Url;

use crate::convert::{bedrock, openai};
use crate::error::LlmError;
use crate::family::ModelFamily;
use crate::normalize::merge_consecutive_roles;
use crate::protocol::openai::OpenAiResponse;
use crate::provider::{ProviderDescriptor, ProviderSet, WireFormat};
use crate::types::{CompletionRequest, CompletionResponse, ContentBlock, StopReason};

/// A request ready to send upstream
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest {
    pub decision: RoutingDecision,
    pub provider: String,
    /// Model sent upstream
    pub model: String,
    pub format: WireFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<ModelFamily>,
    pub url: Url,
    pub body: Value,
    /// Whether the client offered any tools
    #[serde(skip)]
    pub tools_offered: bool,
    #[serde(skip)]
    pub native_tool_calls: bool,
}

/// Routing, translation and tool-call recovery over a fixed configuration
#[derive(Debug)]
pub struct Gateway {
    providers: ProviderSet,
    router: Router,
    parsers: ParserRegistry,
}

impl Gateway {
    /// Build the gateway, rejecting Bedrock tier models of unknown family
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let providers = ProviderSet::from_config(config)?;
        let router = Router::new(config)?;

        for (_, target) in router.tiers().into_iter().flat_map(TierTargets::targets) {
            if providers.get(&target.provider)?.wire_format() == WireFormat::Bedrock {
                ModelFamily::detect(&target.model)?;
            }
        }

        Ok(Self {
            providers,
            router,
            parsers: parser_registry(Some(&config.parsers)),
        })
    }

    /// Replace the tier classifier
    #[must_use]
    pub fn with_classifier(self, classifier: Arc<dyn ComplexityClassifier>) -> Self {
        Self {
            router: self.router.with_classifier(classifier),
            ..self
        }
    }

    pub const fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    pub const fn router(&self) -> &Router {
        &self.router
    }

    pub const fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    /// Route a request and translate it for the chosen provider
    pub async fn prepare(&self, mut request: CompletionRequest) -> Result<UpstreamRequest, LlmError> {
        let payload = serde_json::to_value(&request).map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
        let decision = self.router.route(&payload).await;

        let provider = self.providers.get(&decision.provider)?;
        let model = provider.resolve_model(decision.model.as_deref(), &request.model)?;

        request.messages = merge_consecutive_roles(request.messages);
        let (family, body) = translate_request(provider, &model, &request)?;

        Ok(UpstreamRequest {
            url: provider.request_url(&model)?,
            provider: provider.name.clone(),
            format: provider.wire_format(),
            tools_offered: request.offers_tools(),
            native_tool_calls: provider.native_tool_calls,
            decision,
            model,
            family,
            body,
        })
    }

    /// Translate an upstream response body and recover any tool calls
    pub fn finish(&self, upstream: &UpstreamRequest, body: Value) -> Result<CompletionResponse, LlmError> {
        let response = match upstream.format {
            WireFormat::OpenAi => {
                let response: OpenAiResponse =
                    serde_json::from_value(body).map_err(|source| LlmError::InvalidResponse {
                        format: "openai",
                        source,
                    })?;
                openai::response_from_openai(response, &upstream.model)?
            }
            WireFormat::Anthropic => {
                serde_json::from_value(body).map_err(|source| LlmError::InvalidResponse {
                    format: "anthropic",
                    source,
                })?
            }
            WireFormat::Bedrock => {
                let family = upstream
                    .family
                    .map_or_else(|| ModelFamily::detect(&upstream.model), Ok)?;
                bedrock::decode_response(family, body, &upstream.model)?
            }
        };

        let recover = upstream.tools_offered
            && (!upstream.native_tool_calls || self.parsers.variant_for(&upstream.model) != ParserVariant::Generic);
        Ok(self.recover_tool_calls(&upstream.model, recover, response))
    }

    /// Clean a response's tool calls, optionally recovering them from text
    ///
    /// Reasoning blocks are stripped from text and structured `tool_use`
    /// blocks have their arguments scrubbed. With `recover` set and no
    /// structured call present, the text is handed to the model's parser;
    /// recovered calls replace the text blocks and the stop reason becomes
    /// `tool_use`.
    pub fn recover_tool_calls(&self, model: &str, recover: bool, mut response: CompletionResponse) -> CompletionResponse {
        let parser = self.parsers.parser_for(Some(model));

        let blocks = std::mem::take(&mut response.content);
        response.content = blocks
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => {
                    let stripped = parser.strip_reasoning_tags(&text);
                    (!stripped.trim().is_empty()).then(|| ContentBlock::Text {
                        text: stripped.into_owned(),
                    })
                }
                ContentBlock::ToolUse { id, name, input } => {
                    let call = ParsedCall::Input(InputCall {
                        id: Some(id.clone()),
                        name,
                        input,
                    });
                    Some(tool_use_block(&parser.clean_arguments(&call), id))
                }
                other => Some(other),
            })
            .collect();

        if !recover || response.has_tool_use() {
            return response;
        }

        let text = response
            .content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n");
        let Some(recovery) = parser.recover(&text) else {
            return response;
        };

        let calls = parser.normalize_tool_calls(recovery.calls);
        tracing::debug!(
            model,
            variant = %parser.variant(),
            strategy = %recovery.strategy,
            count = calls.len(),
            "recovered tool calls from text"
        );
        switchyard_telemetry::metrics::record_parser_recovery(
            parser.variant().as_ref(),
            recovery.strategy.as_ref(),
            calls.len(),
        );

        response.content = calls
            .into_iter()
            .map(|call| {
                let id = call.id().map_or_else(generate_tool_use_id, str::to_owned);
                tool_use_block(&call, id)
            })
            .collect();
        response.stop_reason = Some(StopReason::ToolUse);
        response
    }
}

/// Canonical request in the provider's wire format
pub fn translate_request(
    provider: &ProviderDescriptor,
    model: &str,
    request: &CompletionRequest,
) -> Result<(Option<ModelFamily>, Value), LlmError> {
    match provider.wire_format() {
        WireFormat::OpenAi => {
            let body = openai::request_to_openai(request, model);
            let body = serde_json::to_value(body).map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
            Ok((None, body))
        }
        WireFormat::Anthropic => {
            let mut body = serde_json::to_value(request).map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
            if let Value::Object(fields) = &mut body {
                fields.insert("model".to_owned(), Value::String(model.to_owned()));
            }
            Ok((None, body))
        }
        WireFormat::Bedrock => {
            let family = ModelFamily::detect(model)?;
            Ok((Some(family), bedrock::encode_request(family, request)?))
        }
    }
}

/// Parser registry with configured entries ahead of the built-in table
pub fn parser_registry(config: Option<&ParsersConfig>) -> ParserRegistry {
    let entries = config.map_or(&[][..], |c| c.entries.as_slice());
    ParserRegistry::with_entries(
        entries
            .iter()
            .map(|entry| RegistryEntry::new(&entry.prefix, parser_variant(entry.variant))),
    )
}

const fn parser_variant(name: ParserVariantName) -> ParserVariant {
    match name {
        ParserVariantName::Generic => ParserVariant::Generic,
        ParserVariantName::Glm => ParserVariant::GlmFamily,
    }
}

fn generate_tool_use_id() -> String {
    format!("toolu_{}", uuid::Uuid::new_v4().simple())
}

fn tool_use_block(call: &ParsedCall, id: String) -> ContentBlock {
    let input = call.arguments().map_or_else(
        || match call {
            ParsedCall::Function(function) => function.function.arguments.clone(),
            ParsedCall::Input(input) => input.input.clone(),
        },
        Value::Object,
    );

    ContentBlock::ToolUse {
        id,
        name: call.name().to_owned(),
        input,
    }
}
