use switchyard_routing::RoutingError;
use thiserror::Error;

/// Errors raised while preparing or translating gateway traffic
#[derive(Debug, Error)]
pub enum LlmError {
    /// Bedrock model ID matches no known model family
    #[error("unsupported Bedrock model: {model}")]
    UnsupportedModel { model: String },

    /// Named provider does not exist in configuration
    #[error("provider not found: {provider}")]
    ProviderNotFound { provider: String },

    /// Neither the provider nor the request names a model
    #[error("no model for provider {provider}")]
    MissingModel { provider: String },

    /// Provider has no usable endpoint
    #[error("provider {provider} has no endpoint configured")]
    MissingEndpoint { provider: String },

    /// Endpoint URL could not be built
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client sent a malformed or invalid request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream body did not match the expected wire format
    #[error("invalid {format} response: {source}")]
    InvalidResponse {
        format: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Upstream body carried no completion
    #[error("{format} response has no output")]
    EmptyResponse { format: &'static str },

    #[error(transparent)]
    Routing(#[from] RoutingError),
}
