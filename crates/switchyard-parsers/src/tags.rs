use std::borrow::Cow;

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Closing tags that models leak outside of a proper block, with their openers
const ORPHAN_CANDIDATES: [(&str, &str); 4] = [
    ("<arg_value>", "</arg_value>"),
    ("<arg_key>", "</arg_key>"),
    ("<tool_call>", "</tool_call>"),
    (THINK_OPEN, THINK_CLOSE),
];

/// Delete every complete `<think>...</think>` pair
///
/// An opener without a closer is left alone. The result is trimmed when
/// anything was removed.
pub fn strip_reasoning_pairs(text: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut rest = text;
    let mut changed = false;

    while let Some(start) = rest.find(THINK_OPEN) {
        let inner = &rest[start + THINK_OPEN.len()..];
        let Some(end) = inner.find(THINK_CLOSE) else { break };

        out.push_str(&rest[..start]);
        rest = &inner[end + THINK_CLOSE.len()..];
        changed = true;
    }

    if !changed {
        return Cow::Borrowed(text);
    }

    out.push_str(rest);
    Cow::Owned(out.trim().to_owned())
}

/// Delete closing tags whose opening tag appears nowhere in the text
///
/// A closer is kept whenever its opener occurs anywhere, so well-formed
/// blocks are never altered.
pub fn strip_orphan_closers(text: &str) -> Cow<'_, str> {
    let mut out = Cow::Borrowed(text);

    for (open, close) in ORPHAN_CANDIDATES {
        if out.contains(close) && !out.contains(open) {
            out = Cow::Owned(out.replace(close, ""));
        }
    }

    out
}

/// Reasoning pairs first, then orphaned closers
pub fn hygiene(text: &str) -> Cow<'_, str> {
    match strip_reasoning_pairs(text) {
        Cow::Borrowed(text) => strip_orphan_closers(text),
        Cow::Owned(stripped) => Cow::Owned(strip_orphan_closers(&stripped).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_complete_reasoning_pairs() {
        let out = strip_reasoning_pairs("<think>plan it</think>\nanswer <think>more</think>done");
        assert_eq!(out, "answer done");
    }

    #[test]
    fn text_without_pairs_is_borrowed() {
        assert!(matches!(strip_reasoning_pairs("plain answer"), Cow::Borrowed(_)));
        assert!(matches!(strip_reasoning_pairs("<think>never closed"), Cow::Borrowed(_)));
    }

    #[test]
    fn orphan_closer_is_removed() {
        assert_eq!(strip_orphan_closers("Invoking tool(s): Grep</arg_value>"), "Invoking tool(s): Grep");
    }

    #[test]
    fn closer_with_opener_elsewhere_is_kept() {
        let text = "<arg_value>ls</arg_value> then </arg_value>";
        assert!(matches!(strip_orphan_closers(text), Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn hygiene_removes_stray_think_closer_after_pairs() {
        assert_eq!(hygiene("<think>a</think>ok</think>"), "ok");
    }
}
