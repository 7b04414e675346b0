use std::fmt;

use serde::{Serialize, Serializer};

use crate::tier::Tier;

/// Which routing mode produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RoutingMethod {
    Static,
    PreferLocal,
    Tier,
}

/// Why a provider was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingReason {
    /// No complete tier table, so the primary serves everything
    TierRoutingDisabled,
    /// The request offers no tools
    NoTools,
    /// The local model is known not to call tools
    LocalModelLacksToolSupport,
    /// Escalation was warranted but no fallback is enabled
    FallbackDisabled,
    /// Fewer tools than the escalation threshold
    BelowToolThreshold,
    /// At least as many tools as the escalation threshold
    ToolThresholdExceeded,
    /// The classifier picked this tier
    Tier(Tier),
    /// The classifier failed and the medium tier was used
    ClassificationFailed,
}

impl fmt::Display for RoutingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TierRoutingDisabled => f.write_str("tier_routing_disabled"),
            Self::NoTools => f.write_str("no_tools"),
            Self::LocalModelLacksToolSupport => f.write_str("local_model_lacks_tool_support"),
            Self::FallbackDisabled => f.write_str("fallback_disabled"),
            Self::BelowToolThreshold => f.write_str("below_tool_threshold"),
            Self::ToolThresholdExceeded => f.write_str("tool_threshold_exceeded"),
            Self::Tier(tier) => write!(f, "tier_{tier}"),
            Self::ClassificationFailed => f.write_str("classification_failed"),
        }
    }
}

impl Serialize for RoutingReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The provider, and in tier mode the model, chosen for one request
///
/// Serializes as `{ "provider", "method", "reason", "model" }` with a null
/// model outside tier mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    pub provider: String,
    pub method: RoutingMethod,
    pub reason: RoutingReason,
    pub model: Option<String>,
}

impl RoutingDecision {
    pub(crate) fn new(provider: impl Into<String>, method: RoutingMethod, reason: RoutingReason) -> Self {
        Self {
            provider: provider.into(),
            method,
            reason,
            model: None,
        }
    }

    #[must_use]
    pub(crate) fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
