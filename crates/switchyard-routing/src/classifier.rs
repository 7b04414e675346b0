use async_trait::async_trait;
use serde_json::Value;

use crate::analysis::RequestProfile;
use crate::error::RoutingError;
use crate::tier::Tier;

/// Picks a complexity tier for a canonical request
///
/// Implementations may call out to a model or a remote service; this is the
/// only point in routing that suspends.
#[async_trait]
pub trait ComplexityClassifier: Send + Sync {
    async fn classify(&self, payload: &Value) -> Result<Tier, RoutingError>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Token and keyword heuristics, no I/O
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

#[async_trait]
impl ComplexityClassifier for HeuristicClassifier {
    async fn classify(&self, payload: &Value) -> Result<Tier, RoutingError> {
        let profile = RequestProfile::from_payload(payload);
        let tier = profile.tier();

        tracing::debug!(
            task = ?profile.task,
            tokens = profile.estimated_tokens,
            tools = profile.tool_count,
            %tier,
            "request classified"
        );

        Ok(tier)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
