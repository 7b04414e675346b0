//! Complexity tiers and their configured targets

use serde::Serialize;
use switchyard_config::Config;

use crate::error::RoutingError;

/// Complexity class of a request
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    Simple,
    Medium,
    Complex,
    Reasoning,
}

impl Tier {
    /// One tier up, saturating at the top
    pub const fn bump(self) -> Self {
        match self {
            Self::Simple => Self::Medium,
            Self::Medium => Self::Complex,
            Self::Complex | Self::Reasoning => Self::Reasoning,
        }
    }
}

/// A concrete provider and model for one tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTarget {
    pub provider: String,
    pub model: String,
}

/// Resolved targets for all four tiers
#[derive(Debug, Clone)]
pub struct TierTargets {
    simple: TierTarget,
    medium: TierTarget,
    complex: TierTarget,
    reasoning: TierTarget,
}

impl TierTargets {
    /// Resolve the tier table, or `None` unless every tier is configured
    pub fn from_config(config: &Config, primary: &str) -> Result<Option<Self>, RoutingError> {
        let tiers = &config.routing.tiers;
        if !tiers.is_complete() {
            return Ok(None);
        }

        let resolve = |tier: Tier, target: Option<&str>| {
            target
                .and_then(|target| resolve_target(config, primary, target))
                .ok_or(RoutingError::MissingTier(tier))
        };

        Ok(Some(Self {
            simple: resolve(Tier::Simple, tiers.simple.as_deref())?,
            medium: resolve(Tier::Medium, tiers.medium.as_deref())?,
            complex: resolve(Tier::Complex, tiers.complex.as_deref())?,
            reasoning: resolve(Tier::Reasoning, tiers.reasoning.as_deref())?,
        }))
    }

    /// Every tier with its target, cheapest first
    pub fn targets(&self) -> impl Iterator<Item = (Tier, &TierTarget)> {
        [Tier::Simple, Tier::Medium, Tier::Complex, Tier::Reasoning]
            .into_iter()
            .map(move |tier| (tier, self.get(tier)))
    }

    pub const fn get(&self, tier: Tier) -> &TierTarget {
        match tier {
            Tier::Simple => &self.simple,
            Tier::Medium => &self.medium,
            Tier::Complex => &self.complex,
            Tier::Reasoning => &self.reasoning,
        }
    }
}

/// `provider/model` when the head names a declared provider, otherwise a
/// model served by the primary
pub fn resolve_target(config: &Config, primary: &str, target: &str) -> Option<TierTarget> {
    let (provider, model) = match target.split_once('/') {
        Some((head, model)) if config.llm.providers.contains_key(head) => (head, model),
        _ => (primary, target),
    };

    let model = model.trim();
    (!model.is_empty()).then(|| TierTarget {
        provider: provider.to_owned(),
        model: model.to_owned(),
    })
}
