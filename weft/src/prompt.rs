//! Prompt templates with `{placeholder}` substitution from state.
//!
//! Substitution happens once, synchronously, before the model is invoked.
//! A placeholder with no matching variable renders as the literal `unknown`
//! rather than failing: a half-filled state (e.g. no warranty status
//! recorded yet) must still produce a usable prompt.

use std::collections::HashMap;

/// Variables for one render, keyed by placeholder name.
pub type TemplateVars = HashMap<String, String>;

/// A prompt template: plain text with `{name}` placeholders.
///
/// Only `[A-Za-z0-9_]` runs inside braces are treated as placeholders;
/// anything else (code blocks, JSON examples) is copied through verbatim.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Renders the template, substituting each placeholder from `vars` or the
    /// literal `unknown` when absent.
    pub fn render(&self, vars: &TemplateVars) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close)
                    if close > 0
                        && after[..close]
                            .bytes()
                            .all(|b| b.is_ascii_alphanumeric() || b == b'_') =>
                {
                    let name = &after[..close];
                    match vars.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str("unknown"),
                    }
                    rest = &after[close + 1..];
                }
                _ => {
                    // Not a placeholder; keep the brace literally.
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
