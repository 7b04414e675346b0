const FENCE: &str = "```";

/// A fenced code block inside markdown text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Info string after the opening fence, trimmed
    pub lang: &'a str,
    /// Everything between the opening line and the closing fence
    pub body: &'a str,
}

/// Every closed fenced block, in order of appearance
///
/// An opening fence without a newline after it or without a closing fence
/// ends the scan.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(FENCE) {
        let info_start = pos + offset + FENCE.len();
        let Some(newline) = text[info_start..].find('\n') else { break };
        let body_start = info_start + newline + 1;
        let Some(close) = text[body_start..].find(FENCE) else { break };

        blocks.push(FencedBlock {
            lang: text[info_start..info_start + newline].trim(),
            body: &text[body_start..body_start + close],
        });

        pos = body_start + close + FENCE.len();
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_blocks_with_language_tags() {
        let text = "intro\n```bash\nls -la\n```\nmiddle\n```python\nprint(1)\n```\n";
        let blocks = fenced_blocks(text);

        assert_eq!(
            blocks,
            vec![
                FencedBlock {
                    lang: "bash",
                    body: "ls -la\n"
                },
                FencedBlock {
                    lang: "python",
                    body: "print(1)\n"
                },
            ]
        );
    }

    #[test]
    fn unclosed_fence_yields_nothing() {
        assert!(fenced_blocks("```sh\nls\n").is_empty());
        assert!(fenced_blocks("inline ```ls```").is_empty());
    }
}
