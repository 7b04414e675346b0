//! Provider descriptors built from configuration

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Serialize;
use switchyard_config::{Config, LlmProviderConfig, ProviderKind};
use url::Url;

use crate::convert::bedrock;
use crate::error::LlmError;
use crate::family::ModelFamily;

/// API version sent to Azure `OpenAI` deployments
const AZURE_API_VERSION: &str = "2024-10-21";

/// Body shape a provider accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WireFormat {
    /// `OpenAI` chat completions
    OpenAi,
    /// Anthropic Messages, the canonical shape
    Anthropic,
    /// Bedrock `InvokeModel`, shaped per model family
    Bedrock,
}

impl WireFormat {
    pub const fn for_kind(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Anthropic => Self::Anthropic,
            ProviderKind::Bedrock => Self::Bedrock,
            ProviderKind::Openai
            | ProviderKind::Openrouter
            | ProviderKind::AzureOpenai
            | ProviderKind::Ollama
            | ProviderKind::Llamacpp
            | ProviderKind::Lmstudio => Self::OpenAi,
        }
    }
}

/// Credentials available to a provider; `Debug` never shows the values
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub api_key: Option<SecretString>,
    pub access_key_id: Option<SecretString>,
    pub secret_access_key: Option<SecretString>,
}

/// Bedrock placement of a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedrockTarget {
    pub region: String,
    /// Family of the configured default model
    pub family: Option<ModelFamily>,
}

/// Everything the gateway needs to address one provider
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub name: String,
    pub kind: ProviderKind,
    pub credentials: Credentials,
    /// Base endpoint, before any per-request path
    pub endpoint: Url,
    /// Whether the provider emits structured tool calls
    pub native_tool_calls: bool,
    pub default_model: Option<String>,
    pub bedrock: Option<BedrockTarget>,
}

impl ProviderDescriptor {
    /// Build a descriptor, checking a Bedrock default model's family up front
    pub fn from_config(name: &str, config: &LlmProviderConfig) -> Result<Self, LlmError> {
        let bedrock_target = match (config.kind, config.region.as_deref()) {
            (ProviderKind::Bedrock, Some(region)) => Some(BedrockTarget {
                region: region.to_owned(),
                family: config.model.as_deref().map(ModelFamily::detect).transpose()?,
            }),
            _ => None,
        };

        let endpoint = match (&config.base_url, &bedrock_target) {
            (Some(url), _) => url.clone(),
            (None, Some(target)) => bedrock::regional_endpoint(&target.region)?,
            (None, None) => config
                .kind
                .default_base_url()
                .map(Url::parse)
                .transpose()?
                .ok_or_else(|| LlmError::MissingEndpoint {
                    provider: name.to_owned(),
                })?,
        };

        Ok(Self {
            name: name.to_owned(),
            kind: config.kind,
            credentials: Credentials {
                api_key: config.api_key.clone(),
                access_key_id: config.access_key_id.clone(),
                secret_access_key: config.secret_access_key.clone(),
            },
            endpoint,
            native_tool_calls: config.native_tool_calls(),
            default_model: config.model.clone(),
            bedrock: bedrock_target,
        })
    }

    pub const fn wire_format(&self) -> WireFormat {
        WireFormat::for_kind(self.kind)
    }

    /// Model to send upstream: a routed override, the provider default, or
    /// whatever the client asked for
    pub fn resolve_model(&self, routed: Option<&str>, requested: &str) -> Result<String, LlmError> {
        routed
            .or(self.default_model.as_deref())
            .or_else(|| Some(requested).filter(|m| !m.trim().is_empty()))
            .map(str::to_owned)
            .ok_or_else(|| LlmError::MissingModel {
                provider: self.name.clone(),
            })
    }

    /// Full request URL for a completion against `model`
    pub fn request_url(&self, model: &str) -> Result<Url, LlmError> {
        match self.kind {
            ProviderKind::Bedrock => bedrock::invoke_url(&self.endpoint, model),
            ProviderKind::Anthropic => self.join("messages"),
            // Their default endpoints stop at the host
            ProviderKind::Ollama | ProviderKind::Llamacpp if !self.endpoint.path().trim_end_matches('/').ends_with("/v1") => {
                self.join("v1/chat/completions")
            }
            ProviderKind::AzureOpenai => {
                let mut url = self.join("chat/completions")?;
                url.query_pairs_mut().append_pair("api-version", AZURE_API_VERSION);
                Ok(url)
            }
            _ => self.join("chat/completions"),
        }
    }

    fn join(&self, path: &str) -> Result<Url, LlmError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}

/// All configured providers, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ProviderSet {
    providers: IndexMap<String, ProviderDescriptor>,
}

impl ProviderSet {
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let providers = config
            .llm
            .providers
            .iter()
            .map(|(name, provider)| Ok((name.clone(), ProviderDescriptor::from_config(name, provider)?)))
            .collect::<Result<_, LlmError>>()?;

        Ok(Self { providers })
    }

    pub fn get(&self, name: &str) -> Result<&ProviderDescriptor, LlmError> {
        self.providers.get(name).ok_or_else(|| LlmError::ProviderNotFound {
            provider: name.to_owned(),
        })
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
