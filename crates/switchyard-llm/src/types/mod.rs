mod message;
mod request;
mod response;

pub use message::{Content, ContentBlock, FunctionCall, Message, Role, ToolCall, ToolResultContent};
pub use request::{CompletionRequest, ToolDefinition};
pub use response::{CompletionResponse, StopReason, Usage};
