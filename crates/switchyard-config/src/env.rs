use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `{{ env.NAME }}` with an optional `| default("value")` suffix
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#).expect("must be valid regex")
});

/// Expand environment placeholders in raw configuration text
///
/// Only the `env.` scope exists. Comment lines are copied verbatim so that
/// commented-out secrets never need to be set.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut expanded: Vec<String> = Vec::new();

    for line in input.split('\n') {
        if line.trim_start().starts_with('#') {
            expanded.push(line.to_owned());
            continue;
        }

        let mut failure = None;
        let replaced = PLACEHOLDER_RE.replace_all(line, |caps: &Captures<'_>| {
            match resolve(&caps[1], caps.get(2).map(|m| m.as_str())) {
                Ok(value) => value,
                Err(e) => {
                    failure.get_or_insert(e);
                    String::new()
                }
            }
        });

        if let Some(e) = failure {
            return Err(e);
        }
        expanded.push(replaced.into_owned());
    }

    Ok(expanded.join("\n"))
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, String> {
    let Some(name) = key.strip_prefix("env.").filter(|n| !n.is_empty() && !n.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_untouched() {
        let input = "[routing]\nprimary = \"local\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_variables_across_lines() {
        temp_env::with_vars([("SY_KEY", Some("k-1")), ("SY_REGION", Some("eu-west-1"))], || {
            let out = expand_env("api_key = \"{{ env.SY_KEY }}\"\nregion = \"{{env.SY_REGION}}\"").unwrap();
            assert_eq!(out, "api_key = \"k-1\"\nregion = \"eu-west-1\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("SY_ABSENT", || {
            let err = expand_env("api_key = \"{{ env.SY_ABSENT }}\"").unwrap_err();
            assert!(err.contains("SY_ABSENT"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("SY_OPTIONAL", || {
            let out = expand_env("model = \"{{ env.SY_OPTIONAL | default(\"qwen3:8b\") }}\"").unwrap();
            assert_eq!(out, "model = \"qwen3:8b\"");
        });
        temp_env::with_var("SY_OPTIONAL", Some("glm-4.7"), || {
            let out = expand_env("model = \"{{ env.SY_OPTIONAL | default(\"qwen3:8b\") }}\"").unwrap();
            assert_eq!(out, "model = \"glm-4.7\"");
        });
    }

    #[test]
    fn other_scopes_are_rejected() {
        let err = expand_env("x = \"{{ secrets.TOKEN }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("SY_COMMENTED", || {
            let input = "  # api_key = \"{{ env.SY_COMMENTED }}\"\nprefer_local = true";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
