//! Provider routing for Switchyard
//!
//! Three modes, picked from configuration:
//! - **Static**: the primary provider serves every request
//! - **Prefer-local**: a local primary keeps requests with few tools and
//!   escalates the rest to a cloud fallback
//! - **Tier**: a complexity classifier maps each request to a configured
//!   provider and model

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod analysis;
pub mod capability;
pub mod classifier;
pub mod decision;
pub mod error;
mod router;
pub mod tier;

pub use analysis::RequestProfile;
pub use capability::CapabilityTable;
pub use classifier::{ComplexityClassifier, HeuristicClassifier};
pub use decision::{RoutingDecision, RoutingMethod, RoutingReason};
pub use error::RoutingError;
pub use router::{Router, RoutingMode};
pub use tier::{Tier, TierTarget, TierTargets};
