use indexmap::IndexMap;
use serde::Deserialize;

/// Provider and model selection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Primary provider name (defaults to the first declared provider)
    #[serde(default)]
    pub primary: Option<String>,
    /// Keep tool-light requests on a local primary and escalate the rest
    #[serde(default)]
    pub prefer_local: bool,
    /// Whether escalation to the fallback provider is allowed
    #[serde(default)]
    pub fallback_enabled: bool,
    /// Cloud provider used when a local primary should not serve a request
    #[serde(default)]
    pub fallback_provider: Option<String>,
    /// Tool count at or above which a local primary escalates
    #[serde(default = "default_tool_threshold")]
    pub tool_threshold: usize,
    /// Complexity tier to model mappings
    #[serde(default)]
    pub tiers: TierModels,
    /// Local model name prefix to tool-calling support overrides
    #[serde(default)]
    pub local_tool_capability: IndexMap<String, bool>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            primary: None,
            prefer_local: false,
            fallback_enabled: false,
            fallback_provider: None,
            tool_threshold: default_tool_threshold(),
            tiers: TierModels::default(),
            local_tool_capability: IndexMap::new(),
        }
    }
}

const fn default_tool_threshold() -> usize {
    3
}

/// Model targets per complexity tier
///
/// Values are either `provider/model` or a bare model name served by the
/// primary provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierModels {
    /// Target for simple requests
    #[serde(default)]
    pub simple: Option<String>,
    /// Target for medium requests
    #[serde(default)]
    pub medium: Option<String>,
    /// Target for complex requests
    #[serde(default)]
    pub complex: Option<String>,
    /// Target for reasoning-heavy requests
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl TierModels {
    /// Tier routing only turns on when every tier has a target
    pub const fn is_complete(&self) -> bool {
        self.simple.is_some() && self.medium.is_some() && self.complex.is_some() && self.reasoning.is_some()
    }

    /// Tier names paired with their configured targets
    pub fn entries(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("simple", self.simple.as_deref()),
            ("medium", self.medium.as_deref()),
            ("complex", self.complex.as_deref()),
            ("reasoning", self.reasoning.as_deref()),
        ]
    }
}
