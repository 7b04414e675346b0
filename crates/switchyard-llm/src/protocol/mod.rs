//! Upstream wire formats
//!
//! Plain serde structs matching what each upstream API sends and accepts.
//! Nothing outside the `convert` modules should need them.

pub mod bedrock;
pub mod openai;
