/// Byte offset just past the `}` matching the `{` at the start of `input`
///
/// Braces inside JSON strings are ignored, escapes included.
pub fn find_object_end(input: &str) -> Option<usize> {
    if !input.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Start of the first `"name"` key followed by a colon
pub fn find_name_key(text: &str) -> Option<usize> {
    let mut from = 0;

    while let Some(offset) = text[from..].find("\"name\"") {
        let start = from + offset;
        let after = &text[start + "\"name\"".len()..];
        if after.trim_start().starts_with(':') {
            return Some(start);
        }
        from = start + 1;
    }

    None
}
