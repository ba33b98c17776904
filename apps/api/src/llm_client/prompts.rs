// Shared prompt fragments.
// Each pipeline that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the cross-cutting pieces.

/// Closing instruction appended to every prompt that expects a JSON reply.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with ONLY the JSON, no additional text.";

/// Reminder that category maps are closed: exactly these six keys, nothing else.
pub const CATEGORY_KEYS_INSTRUCTION: &str = "\
    Category maps MUST contain exactly these six keys and no others: \
    academic, leadership, service, innovation, personal_story, extracurricular.";

/// Single-pass `{key}` substitution. Inserted values are never re-scanned, so
/// user text containing `{...}` is left alone. Unknown or malformed
/// placeholders (including literal JSON braces) pass through unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (close, *v))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
