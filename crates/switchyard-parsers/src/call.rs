use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured tool invocation
///
/// Two calling conventions are in circulation: Anthropic-style calls carry a
/// typed `input` object, `OpenAI`-style calls wrap `name` and `arguments` in a
/// `function` object where `arguments` is usually a JSON string. Recovered
/// calls use the function shape with object arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolCall {
    Function(FunctionCall),
    Input(InputCall),
}

/// `{ "id"?, "function": { "name", "arguments" } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    /// Object, or a string holding serialized JSON
    #[serde(default)]
    pub arguments: Value,
}

/// `{ "id"?, "name", "input" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub input: Value,
}

impl ToolCall {
    /// A function-shaped call with object arguments and no id
    pub fn function(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self::Function(FunctionCall {
            id: None,
            function: FunctionSpec {
                name: name.into(),
                arguments: Value::Object(arguments),
            },
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Function(call) => &call.function.name,
            Self::Input(call) => &call.name,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Function(call) => call.id.as_deref(),
            Self::Input(call) => call.id.as_deref(),
        }
    }

    /// Replace the call id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        match &mut self {
            Self::Function(call) => call.id = Some(id.into()),
            Self::Input(call) => call.id = Some(id.into()),
        }
        self
    }

    /// The argument mapping, decoding string-encoded arguments
    ///
    /// Returns `None` when the arguments are not an object or do not decode
    /// to one.
    pub fn arguments(&self) -> Option<Map<String, Value>> {
        let raw = match self {
            Self::Function(call) => &call.function.arguments,
            Self::Input(call) => &call.input,
        };

        match raw {
            Value::Object(map) => Some(map.clone()),
            Value::String(encoded) => match serde_json::from_str(encoded) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            },
            Value::Null => Some(Map::new()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn recovered_call_serializes_in_function_shape() {
        let mut args = Map::new();
        args.insert("command".to_owned(), json!("ls"));

        let value = serde_json::to_value(ToolCall::function("Bash", args)).unwrap();

        assert_eq!(value, json!({ "function": { "name": "Bash", "arguments": { "command": "ls" } } }));
    }

    #[test]
    fn deserializes_both_conventions() {
        let function: ToolCall = serde_json::from_value(json!({
            "id": "call_1",
            "function": { "name": "Read", "arguments": "{\"path\":\"a.rs\"}" }
        }))
        .unwrap();
        let input: ToolCall = serde_json::from_value(json!({
            "id": "toolu_1",
            "name": "Read",
            "input": { "path": "a.rs" }
        }))
        .unwrap();

        assert!(matches!(function, ToolCall::Function(_)));
        assert!(matches!(input, ToolCall::Input(_)));
        assert_eq!(function.arguments(), input.arguments());
        assert_eq!(function.id(), Some("call_1"));
    }

    #[test]
    fn undecodable_arguments_are_none() {
        let call: ToolCall = serde_json::from_value(json!({
            "function": { "name": "Read", "arguments": "{\"path\":" }
        }))
        .unwrap();

        assert_eq!(call.arguments(), None);
    }
}
