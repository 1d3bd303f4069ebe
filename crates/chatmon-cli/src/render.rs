//! Placeholder substitution for response messages and follow-up commands
//!
//! Supported placeholders:
//! - `%player%`: the sender
//! - `%word%`: the text that matched, as the sender typed it
//! - `%matchrule%`: the pattern that fired
//! - `%group%`: the owning group
//! - `%message%`: the full original line

use chatmon_rule_engine::WordAction;

/// Values available to templates for one matched line
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub player: &'a str,
    pub original: &'a str,
    pub action: &'a WordAction,
}

impl RenderContext<'_> {
    /// Value for a placeholder name, without the surrounding `%`
    fn value(&self, name: &str) -> Option<&str> {
        match name {
            "player" => Some(self.player),
            "word" => Some(self.action.original_word()),
            "matchrule" => Some(self.action.matched_rule()),
            "group" => Some(self.action.group()),
            "message" => Some(self.original),
            _ => None,
        }
    }
}

/// Replace every known placeholder in `template`
///
/// Substituted values are never scanned again, so a player typing
/// `%group%` gets exactly that text back.
pub fn replace_placeholders(template: &str, ctx: &RenderContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let token = after
            .find('%')
            .and_then(|end| ctx.value(&after[..end]).map(|value| (value, end)));
        match token {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Remove `&`-prefixed colour and format codes (`&c`, `&l`, `&r`, ...)
pub fn strip_colour_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '&' {
            if let Some(&code) = chars.peek() {
                if is_colour_code(code) {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }

    out
}

fn is_colour_code(code: char) -> bool {
    matches!(code.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r')
}
