use crate::types::{Content, Message};

/// Merge adjacent turns that share a role
///
/// Only turns whose content is a plain string and that carry no tool-call
/// fields are merged, joined with a newline. Everything else is kept as a
/// separate turn.
pub fn merge_consecutive_roles(messages: Vec<Message>) -> Vec<Message> {
    let mut merged: Vec<Message> = Vec::with_capacity(messages.len());

    for message in messages {
        if let Some(last) = merged.last_mut()
            && mergeable(last, &message)
            && let (Content::Text(head), Content::Text(tail)) = (&mut last.content, &message.content)
        {
            head.push('\n');
            head.push_str(tail);
            continue;
        }
        merged.push(message);
    }

    merged
}

fn mergeable(previous: &Message, next: &Message) -> bool {
    previous.role == next.role
        && previous.content.is_text()
        && next.content.is_text()
        && !previous.is_openai_shaped()
        && !next.is_openai_shaped()
}
