use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use switchyard_config::Config;

use crate::analysis;
use crate::capability::CapabilityTable;
use crate::classifier::{ComplexityClassifier, HeuristicClassifier};
use crate::decision::{RoutingDecision, RoutingMethod, RoutingReason};
use crate::error::RoutingError;
use crate::tier::{Tier, TierTargets};

/// Routing mode in effect for a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum RoutingMode {
    /// Every request goes to the primary
    Static,
    /// A local primary keeps tool-light requests and escalates the rest
    PreferLocal,
    /// A classifier picks a complexity tier per request
    Tier,
}

/// Decides which provider serves each request
///
/// Built once from validated configuration. Tier mode wins when a complete
/// tier table exists, even if `prefer_local` is also set.
pub struct Router {
    primary: String,
    primary_is_local: bool,
    local_model: Option<String>,
    prefer_local: bool,
    fallback: Option<String>,
    tool_threshold: usize,
    capabilities: CapabilityTable,
    tiers: Option<TierTargets>,
    classifier: Arc<dyn ComplexityClassifier>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("primary", &self.primary)
            .field("mode", &self.mode())
            .field("fallback", &self.fallback)
            .field("tool_threshold", &self.tool_threshold)
            .field("classifier", &self.classifier.name())
            .finish_non_exhaustive()
    }
}

impl Router {
    pub fn new(config: &Config) -> Result<Self, RoutingError> {
        let primary = config.primary_provider().ok_or(RoutingError::NoPrimary)?;
        let primary_config = config
            .llm
            .providers
            .get(primary)
            .ok_or_else(|| RoutingError::UnknownProvider(primary.to_owned()))?;

        let fallback = match config.routing.fallback_provider.as_deref() {
            Some(name) if config.routing.fallback_enabled => {
                if !config.llm.providers.contains_key(name) {
                    return Err(RoutingError::UnknownProvider(name.to_owned()));
                }
                Some(name.to_owned())
            }
            _ => None,
        };

        Ok(Self {
            primary: primary.to_owned(),
            primary_is_local: primary_config.kind.is_local(),
            local_model: primary_config.model.clone(),
            prefer_local: config.routing.prefer_local,
            fallback,
            tool_threshold: config.routing.tool_threshold,
            capabilities: CapabilityTable::new(&config.routing.local_tool_capability),
            tiers: TierTargets::from_config(config, primary)?,
            classifier: Arc::new(HeuristicClassifier),
        })
    }

    /// Replace the tier classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn ComplexityClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Fallback provider, present only when escalation is enabled
    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Tier table, present only in tier mode
    pub const fn tiers(&self) -> Option<&TierTargets> {
        self.tiers.as_ref()
    }

    pub const fn mode(&self) -> RoutingMode {
        if self.tiers.is_some() {
            RoutingMode::Tier
        } else if self.prefer_local && self.primary_is_local {
            RoutingMode::PreferLocal
        } else {
            RoutingMode::Static
        }
    }

    /// Route one canonical request payload
    ///
    /// Never fails: classifier errors degrade to the medium tier.
    pub async fn route(&self, payload: &Value) -> RoutingDecision {
        let tool_count = analysis::tool_count(payload);
        let model = self.local_model(payload);

        let decision = match self.mode() {
            RoutingMode::Static => self.route_static(),
            RoutingMode::PreferLocal => self.route_prefer_local(tool_count, model),
            RoutingMode::Tier => self.route_tier(payload).await,
        };

        tracing::info!(
            provider = %decision.provider,
            method = %decision.method,
            reason = %decision.reason,
            model = decision.model.as_deref(),
            tool_count,
            threshold = self.tool_threshold,
            supports_tools = ?model.and_then(|m| self.capabilities.supports_tools(m)),
            "routing decision"
        );
        switchyard_telemetry::metrics::record_routing_decision(
            &decision.provider,
            decision.method.as_ref(),
            &decision.reason.to_string(),
        );

        decision
    }

    /// The primary, regardless of payload
    pub fn route_static(&self) -> RoutingDecision {
        RoutingDecision::new(&self.primary, RoutingMethod::Static, RoutingReason::TierRoutingDisabled)
    }

    /// Keep the request local or escalate it, from its tool count alone
    pub fn route_prefer_local(&self, tool_count: usize, model: Option<&str>) -> RoutingDecision {
        if tool_count == 0 {
            return self.stay_local(RoutingReason::NoTools);
        }

        if model.and_then(|m| self.capabilities.supports_tools(m)) == Some(false) {
            return self.escalate(RoutingReason::LocalModelLacksToolSupport);
        }

        if tool_count < self.tool_threshold {
            return self.stay_local(RoutingReason::BelowToolThreshold);
        }

        self.escalate(RoutingReason::ToolThresholdExceeded)
    }

    async fn route_tier(&self, payload: &Value) -> RoutingDecision {
        let Some(tiers) = &self.tiers else {
            return self.route_static();
        };

        let (tier, reason) = match self.classifier.classify(payload).await {
            Ok(tier) => (tier, RoutingReason::Tier(tier)),
            Err(e) => {
                tracing::warn!(classifier = self.classifier.name(), error = %e, "falling back to the medium tier");
                (Tier::Medium, RoutingReason::ClassificationFailed)
            }
        };

        let target = tiers.get(tier);
        RoutingDecision::new(&target.provider, RoutingMethod::Tier, reason).with_model(&target.model)
    }

    fn stay_local(&self, reason: RoutingReason) -> RoutingDecision {
        RoutingDecision::new(&self.primary, RoutingMethod::PreferLocal, reason)
    }

    fn escalate(&self, reason: RoutingReason) -> RoutingDecision {
        match &self.fallback {
            Some(fallback) => RoutingDecision::new(fallback, RoutingMethod::PreferLocal, reason),
            None => self.stay_local(RoutingReason::FallbackDisabled),
        }
    }

    /// Model the local primary will run: its configured default, else the
    /// model the client asked for
    fn local_model<'a>(&'a self, payload: &'a Value) -> Option<&'a str> {
        self.local_model
            .as_deref()
            .or_else(|| payload.get("model").and_then(Value::as_str))
    }
}
