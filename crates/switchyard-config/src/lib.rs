//! Configuration for the Switchyard gateway core
//!
//! Everything is loaded once at startup from a single TOML file and treated
//! as immutable for the lifetime of the process.

#![allow(clippy::must_use_candidate)]

mod env;
pub mod error;
pub mod llm;
mod loader;
pub mod parsers;
pub mod routing;
pub mod telemetry;

use serde::Deserialize;

pub use error::ConfigError;
pub use llm::*;
pub use parsers::*;
pub use routing::*;
pub use telemetry::*;

/// Top-level Switchyard configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Provider and model selection
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Tool-call parser registry overrides
    #[serde(default)]
    pub parsers: ParsersConfig,
    /// Logging and metrics export
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Config {
    /// Name of the primary provider
    ///
    /// An explicit `routing.primary` wins; otherwise the first declared
    /// provider is primary.
    pub fn primary_provider(&self) -> Option<&str> {
        self.routing
            .primary
            .as_deref()
            .or_else(|| self.llm.providers.keys().next().map(String::as_str))
    }
}
