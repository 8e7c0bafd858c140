// Shared prompt-building utilities.
// Each agent defines its own prompt templates alongside it; this file holds
// the cross-cutting helpers every template uses.

use std::collections::BTreeMap;

/// A prompt template whose `{name}` placeholders are filled in a single pass.
/// Substituted values are never rescanned, so user text containing `{name}`
/// stays literal. Unknown placeholders are left as written.
pub struct Prompt<'a> {
    template: &'a str,
    values: Vec<(&'a str, String)>,
}

impl<'a> Prompt<'a> {
    pub fn from_template(template: &'a str) -> Self {
        Self {
            template,
            values: Vec::new(),
        }
    }

    pub fn set(mut self, name: &'a str, value: impl AsRef<str>) -> Self {
        self.values.push((name, value.as_ref().to_string()));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let filled = after.find('}').and_then(|close| {
                let name = &after[..close];
                self.values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (value, close))
            });
            match filled {
                Some((value, close)) => {
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
}

/// Truncates `text` to at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncates for display, appending `...` when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let truncated = truncate_chars(text, max_chars);
    if truncated.len() < text.len() {
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

/// Uppercases the first character of `key`, leaving the rest untouched.
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders additional form fields as `Key: value` lines, one per entry,
/// each prefixed with `prefix` (e.g. `"- "`).
pub fn format_additional_info(info: &BTreeMap<String, String>, prefix: &str) -> String {
    info.iter()
        .map(|(key, value)| format!("{prefix}{}: {value}\n", capitalize(key)))
        .collect()
}
