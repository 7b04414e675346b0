use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Top-level LLM configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// LLM provider configurations keyed by name, in declaration order
    #[serde(default)]
    pub providers: IndexMap<String, LlmProviderConfig>,
}

/// Configuration for a single LLM provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmProviderConfig {
    /// Provider protocol type
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Default model served by this provider
    #[serde(default)]
    pub model: Option<String>,
    /// Override for the native tool-calling capability flag
    #[serde(default)]
    pub tool_calling: Option<bool>,
    /// AWS region (Bedrock only)
    #[serde(default)]
    pub region: Option<String>,
    /// AWS access key ID (Bedrock only)
    #[serde(default)]
    pub access_key_id: Option<SecretString>,
    /// AWS secret access key (Bedrock only)
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
}

impl LlmProviderConfig {
    /// Minimal configuration of the given kind, mostly useful in tests
    pub const fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: None,
            base_url: None,
            model: None,
            tool_calling: None,
            region: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }

    /// Whether this provider can emit structured tool calls natively
    pub fn native_tool_calls(&self) -> bool {
        self.tool_calling.unwrap_or_else(|| self.kind.native_tool_calls())
    }
}

/// Supported LLM provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// `OpenAI` chat completions API
    Openai,
    /// Anthropic Messages API
    Anthropic,
    /// `OpenRouter` (`OpenAI`-compatible)
    Openrouter,
    /// Azure-hosted `OpenAI` deployments
    AzureOpenai,
    /// AWS Bedrock `InvokeModel`
    Bedrock,
    /// Local Ollama server
    Ollama,
    /// Local llama.cpp server
    Llamacpp,
    /// Local LM Studio server
    Lmstudio,
}

impl ProviderKind {
    /// Provider kinds that only ever run on the local machine
    pub const LOCAL_ONLY: &'static [Self] = &[Self::Ollama, Self::Llamacpp, Self::Lmstudio];

    /// Whether this kind is a local inference endpoint
    pub fn is_local(self) -> bool {
        Self::LOCAL_ONLY.contains(&self)
    }

    /// Whether an `api_key` must be configured for this kind
    pub const fn requires_api_key(self) -> bool {
        matches!(
            self,
            Self::Openai | Self::Anthropic | Self::Openrouter | Self::AzureOpenai
        )
    }

    /// Endpoint used when `base_url` is not configured
    pub const fn default_base_url(self) -> Option<&'static str> {
        match self {
            Self::Openai => Some("https://api.openai.com/v1"),
            Self::Anthropic => Some("https://api.anthropic.com/v1"),
            Self::Openrouter => Some("https://openrouter.ai/api/v1"),
            Self::Ollama => Some("http://localhost:11434"),
            Self::Llamacpp => Some("http://localhost:8080"),
            Self::Lmstudio => Some("http://localhost:1234/v1"),
            // Azure needs a resource name, Bedrock derives its endpoint from the region
            Self::AzureOpenai | Self::Bedrock => None,
        }
    }

    /// Whether the provider API accepts and emits structured tool calls
    pub const fn native_tool_calls(self) -> bool {
        !matches!(self, Self::Llamacpp)
    }

    /// Whether requests to this kind use the `OpenAI` chat wire shape
    pub const fn speaks_openai(self) -> bool {
        matches!(
            self,
            Self::Openai | Self::Openrouter | Self::AzureOpenai | Self::Ollama | Self::Llamacpp | Self::Lmstudio
        )
    }
}
