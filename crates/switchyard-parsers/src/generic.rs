use std::borrow::Cow;

use serde_json::Value;

use crate::call::ToolCall;
use crate::{ParserVariant, Recovery, Strategy, ToolCallParser, json_scan, shell};

/// Fallback parser for models without a dedicated variant
#[derive(Debug, Clone)]
pub struct GenericParser {
    model: String,
}

impl GenericParser {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

impl ToolCallParser for GenericParser {
    fn variant(&self) -> ParserVariant {
        ParserVariant::Generic
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn recover(&self, text: &str) -> Option<Recovery> {
        extract_json_call(text).map(|call| Recovery {
            strategy: Strategy::JsonObject,
            calls: vec![call],
        })
    }

    fn clean_arguments<'a>(&self, call: &'a ToolCall) -> Cow<'a, ToolCall> {
        shell::clean_shell_call(call)
    }
}

/// Parse the JSON object around the first `"name":` key
///
/// The object must carry a string `name` and an object `parameters`.
pub(crate) fn extract_json_call(text: &str) -> Option<ToolCall> {
    let key = json_scan::find_name_key(text)?;
    let start = text[..key].rfind('{')?;
    let end = start + json_scan::find_object_end(&text[start..])?;

    let value: Value = serde_json::from_str(&text[start..end]).ok()?;
    let name = value.get("name")?.as_str()?;
    let parameters = value.get("parameters")?.as_object()?;

    Some(ToolCall::function(name, parameters.clone()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_call_embedded_in_prose() {
        let parser = GenericParser::new("llama3.1:8b");
        let text = r#"I'll list the files. {"name": "Bash", "parameters": {"command": "ls"}} Done."#;

        let calls = parser.extract_tool_calls(text).unwrap();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name(), "Bash");
        assert_eq!(calls[0].arguments().unwrap(), json!({ "command": "ls" }).as_object().cloned().unwrap());
    }

    #[test]
    fn nested_braces_in_arguments_are_kept() {
        let parser = GenericParser::new("mistral-small");
        let text = r#"{"name": "Write", "parameters": {"path": "a.json", "content": "{\"k\": {}}"}}"#;

        let calls = parser.extract_tool_calls(text).unwrap();

        assert_eq!(calls[0].arguments().unwrap()["content"], "{\"k\": {}}");
    }

    #[test]
    fn malformed_or_truncated_json_is_none() {
        let parser = GenericParser::new("llama3.1:8b");

        assert_eq!(parser.extract_tool_calls(r#"{"name": "Bash", "parameters": {"command": "ls""#), None);
        assert_eq!(parser.extract_tool_calls(r#"{"name": "Bash", "parameters": {command: ls}}"#), None);
        assert_eq!(parser.extract_tool_calls(""), None);
    }

    #[test]
    fn requires_name_and_object_parameters() {
        let parser = GenericParser::new("llama3.1:8b");

        assert_eq!(parser.extract_tool_calls(r#"{"name": "Bash"}"#), None);
        assert_eq!(parser.extract_tool_calls(r#"{"name": "Bash", "parameters": "ls"}"#), None);
        assert_eq!(parser.extract_tool_calls(r#"{"tool": "Bash", "parameters": {}}"#), None);
    }

    #[test]
    fn recovered_call_round_trips_through_json() {
        let parser = GenericParser::new("llama3.1:8b");
        let calls = parser
            .extract_tool_calls(r#"{"name": "Grep", "parameters": {"pattern": "fn main", "path": "src"}}"#)
            .unwrap();

        let value = serde_json::to_value(&calls[0]).unwrap();

        assert_eq!(
            value,
            json!({ "function": { "name": "Grep", "arguments": { "pattern": "fn main", "path": "src" } } })
        );
    }

    #[test]
    fn normalize_is_identity() {
        let parser = GenericParser::new("llama3.1:8b");
        let call: ToolCall = serde_json::from_value(json!({ "name": "Bash", "input": { "command": "$ ls" } })).unwrap();

        assert_eq!(parser.normalize_tool_calls(vec![call.clone()]), vec![call]);
    }

    #[test]
    fn cleans_shell_calls() {
        let parser = GenericParser::new("llama3.1:8b");
        let call: ToolCall =
            serde_json::from_value(json!({ "name": "Bash", "input": { "command": "- $ ls" } })).unwrap();

        assert_eq!(parser.clean_arguments(&call).arguments().unwrap()["command"], "ls");
    }

    #[test]
    fn strips_reasoning_by_default() {
        let parser = GenericParser::new("deepseek-r1");
        assert_eq!(parser.strip_reasoning_tags("<think>hmm</think>\nHello"), "Hello");
    }
}
