//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::ProviderKind;

/// Fatal startup-time configuration errors
///
/// Any of these stops the process before it serves a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `{{ env.VAR }}` placeholder could not be expanded
    #[error("config variable expansion failed: {0}")]
    Expand(String),

    /// The expanded TOML did not deserialize
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No LLM providers are configured at all
    #[error("at least one LLM provider must be configured")]
    NoProviders,

    /// A routing setting names a provider that does not exist
    #[error("{role} provider '{name}' is not configured under [llm.providers]")]
    UnknownProvider { role: &'static str, name: String },

    /// A provider in use lacks a credential it needs
    #[error("provider '{provider}' ({kind}) is missing required setting `{field}`")]
    MissingCredential {
        provider: String,
        kind: ProviderKind,
        field: &'static str,
    },

    /// Fallback is enabled without naming a fallback provider
    #[error("routing.fallback_enabled is set but routing.fallback_provider is missing")]
    FallbackMissing,

    /// The fallback provider is the primary provider
    #[error("fallback provider '{0}' must differ from the primary provider")]
    FallbackIsPrimary(String),

    /// The fallback provider is a local-only kind
    #[error(
        "fallback provider '{provider}' is a local-only provider ({kind}); the fallback must be a cloud provider"
    )]
    LocalFallback { provider: String, kind: ProviderKind },

    /// A tier target is present but empty
    #[error("routing tier `{tier}` has an empty model target")]
    EmptyTierModel { tier: &'static str },
}
