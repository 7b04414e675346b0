//! Programmatic configuration builder for integration tests

use secrecy::SecretString;
use switchyard_config::{Config, ConfigError, LlmProviderConfig, ParserEntryConfig, ParserVariantName, ProviderKind};
use url::Url;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// An empty configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Local Ollama primary serving `model`, escalating to an Anthropic
    /// fallback at three tools
    pub fn prefer_local(model: &str) -> Self {
        Self::new()
            .with_local_provider("local", ProviderKind::Ollama, Some(model))
            .with_anthropic_provider("cloud")
            .with_primary("local")
            .with_fallback("cloud")
            .with_prefer_local(true)
    }

    /// Add a local provider on its default endpoint
    pub fn with_local_provider(mut self, name: &str, kind: ProviderKind, model: Option<&str>) -> Self {
        let mut provider = LlmProviderConfig::new(kind);
        provider.model = model.map(str::to_owned);
        self.config.llm.providers.insert(name.to_owned(), provider);
        self
    }

    /// Add an Anthropic provider with a test key
    pub fn with_anthropic_provider(mut self, name: &str) -> Self {
        let mut provider = LlmProviderConfig::new(ProviderKind::Anthropic);
        provider.api_key = Some(SecretString::from("test-key"));
        self.config.llm.providers.insert(name.to_owned(), provider);
        self
    }

    /// Add an `OpenAI`-compatible provider at `base_url`
    pub fn with_openai_provider(mut self, name: &str, base_url: &str) -> Self {
        let mut provider = LlmProviderConfig::new(ProviderKind::Openai);
        provider.api_key = Some(SecretString::from("test-key"));
        provider.base_url = Some(Url::parse(base_url).expect("valid URL"));
        self.config.llm.providers.insert(name.to_owned(), provider);
        self
    }

    /// Add a Bedrock provider authenticated with a bearer key
    pub fn with_bedrock_provider(mut self, name: &str, region: &str, model: &str) -> Self {
        let mut provider = LlmProviderConfig::new(ProviderKind::Bedrock);
        provider.api_key = Some(SecretString::from("bedrock-test-key"));
        provider.region = Some(region.to_owned());
        provider.model = Some(model.to_owned());
        self.config.llm.providers.insert(name.to_owned(), provider);
        self
    }

    pub fn with_primary(mut self, name: &str) -> Self {
        self.config.routing.primary = Some(name.to_owned());
        self
    }

    /// Set and enable the fallback provider
    pub fn with_fallback(mut self, name: &str) -> Self {
        self.config.routing.fallback_provider = Some(name.to_owned());
        self.config.routing.fallback_enabled = true;
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.config.routing.fallback_enabled = false;
        self
    }

    pub fn with_prefer_local(mut self, enabled: bool) -> Self {
        self.config.routing.prefer_local = enabled;
        self
    }

    pub fn with_tool_threshold(mut self, threshold: usize) -> Self {
        self.config.routing.tool_threshold = threshold;
        self
    }

    /// Override tool support for a local model prefix
    pub fn with_tool_capability(mut self, prefix: &str, supported: bool) -> Self {
        self.config
            .routing
            .local_tool_capability
            .insert(prefix.to_owned(), supported);
        self
    }

    /// Configure all four tiers
    pub fn with_tiers(mut self, simple: &str, medium: &str, complex: &str, reasoning: &str) -> Self {
        let tiers = &mut self.config.routing.tiers;
        tiers.simple = Some(simple.to_owned());
        tiers.medium = Some(medium.to_owned());
        tiers.complex = Some(complex.to_owned());
        tiers.reasoning = Some(reasoning.to_owned());
        self
    }

    /// Add a parser registry entry ahead of the built-in table
    pub fn with_parser_entry(mut self, prefix: &str, variant: ParserVariantName) -> Self {
        self.config.parsers.entries.push(ParserEntryConfig {
            prefix: prefix.to_owned(),
            variant,
        });
        self
    }

    /// Validate and return the configuration
    pub fn try_build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build the final config, panicking if it does not validate
    pub fn build(self) -> Config {
        self.try_build().expect("test configuration must validate")
    }
}
