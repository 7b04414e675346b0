//! Routing-specific error types

use thiserror::Error;

use crate::tier::Tier;

/// Errors raised while building the router or classifying a request
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No provider is configured to serve as primary
    #[error("no primary provider configured")]
    NoPrimary,

    /// A routing setting names a provider that is not declared
    #[error("routing references unknown provider `{0}`")]
    UnknownProvider(String),

    /// A complete tier table has a tier without a usable target
    #[error("tier `{0}` has no usable model target")]
    MissingTier(Tier),

    /// The complexity classifier could not produce a tier
    #[error("complexity classification failed: {0}")]
    Classification(String),
}
