//! Format translation for Switchyard
//!
//! Requests arrive in a canonical, Anthropic-shaped form. This crate routes
//! them, rewrites them for the chosen provider (`OpenAI` chat completions,
//! Anthropic Messages or a Bedrock model family) and turns the upstream
//! answer back into a canonical response, recovering prose tool calls on
//! the way.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod family;
mod gateway;
pub mod normalize;
pub mod prompt;
pub mod protocol;
pub mod provider;
pub mod types;

pub use error::LlmError;
pub use family::ModelFamily;
pub use gateway::{Gateway, UpstreamRequest, parser_registry, translate_request};
pub use provider::{ProviderDescriptor, ProviderSet, WireFormat};
