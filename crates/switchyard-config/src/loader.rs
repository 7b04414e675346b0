use std::path::Path;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::llm::{LlmProviderConfig, ProviderKind};
use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, expansion or
    /// parsing fails, or validation fails
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        raw.parse()
    }

    /// Validate the startup invariants
    ///
    /// Checked once, before any request is served: the primary provider
    /// exists and has its credentials; a fallback provider, if configured,
    /// exists, has its credentials, is not the primary and is not a
    /// local-only kind; tier targets are non-empty and their providers are
    /// usable.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`ConfigError`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let primary = self.primary_provider().ok_or(ConfigError::NoProviders)?;
        let primary_config = self.provider("primary", primary)?;
        require_credentials(primary, primary_config)?;

        self.validate_fallback(primary)?;
        self.validate_tiers(primary)?;

        if self.routing.prefer_local && !primary_config.kind.is_local() {
            tracing::warn!(
                primary,
                kind = %primary_config.kind,
                "routing.prefer_local has no effect because the primary provider is not local"
            );
        }

        Ok(())
    }

    fn validate_fallback(&self, primary: &str) -> Result<(), ConfigError> {
        let Some(fallback) = self.routing.fallback_provider.as_deref() else {
            if self.routing.fallback_enabled {
                return Err(ConfigError::FallbackMissing);
            }
            return Ok(());
        };

        let fallback_config = self.provider("fallback", fallback)?;

        if fallback == primary {
            return Err(ConfigError::FallbackIsPrimary(fallback.to_owned()));
        }

        if fallback_config.kind.is_local() {
            return Err(ConfigError::LocalFallback {
                provider: fallback.to_owned(),
                kind: fallback_config.kind,
            });
        }

        require_credentials(fallback, fallback_config)
    }

    fn validate_tiers(&self, primary: &str) -> Result<(), ConfigError> {
        for (tier, target) in self.routing.tiers.entries() {
            let Some(target) = target else { continue };

            let provider = match target.split_once('/') {
                Some((head, model)) if self.llm.providers.contains_key(head) => {
                    if model.trim().is_empty() {
                        return Err(ConfigError::EmptyTierModel { tier });
                    }
                    head
                }
                _ => {
                    if target.trim().is_empty() {
                        return Err(ConfigError::EmptyTierModel { tier });
                    }
                    primary
                }
            };

            // Providers only matter when tier routing will actually run
            if self.routing.tiers.is_complete() {
                require_credentials(provider, self.provider("tier", provider)?)?;
            }
        }

        Ok(())
    }

    fn provider(&self, role: &'static str, name: &str) -> Result<&LlmProviderConfig, ConfigError> {
        self.llm.providers.get(name).ok_or_else(|| ConfigError::UnknownProvider {
            role,
            name: name.to_owned(),
        })
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Expand, parse and validate raw TOML configuration text
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let expanded = crate::env::expand_env(raw).map_err(ConfigError::Expand)?;
        let config: Self = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }
}

/// Check that a provider has what it needs to authenticate
fn require_credentials(name: &str, config: &LlmProviderConfig) -> Result<(), ConfigError> {
    let missing = |field| ConfigError::MissingCredential {
        provider: name.to_owned(),
        kind: config.kind,
        field,
    };

    if config.kind.requires_api_key() && !is_present(config.api_key.as_ref()) {
        return Err(missing("api_key"));
    }

    match config.kind {
        ProviderKind::AzureOpenai if config.base_url.is_none() => Err(missing("base_url")),
        ProviderKind::Bedrock => {
            if config.region.as_deref().is_none_or(|r| r.trim().is_empty()) {
                return Err(missing("region"));
            }

            let has_key_pair =
                is_present(config.access_key_id.as_ref()) && is_present(config.secret_access_key.as_ref());
            if !has_key_pair && !is_present(config.api_key.as_ref()) {
                return Err(missing("api_key"));
            }

            Ok(())
        }
        _ => Ok(()),
    }
}

fn is_present(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().trim().is_empty())
}
