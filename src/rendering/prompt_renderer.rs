//! Placeholder renderer implementation.
//!
//! Substitutes the closed token vocabulary into an action's template:
//! labeled sections with degradation-aware labels, raw inline values, fixed
//! nudges, the late-resolved no-text caution, and context-type framing.
//! Unrecognized tokens pass through verbatim so author-written custom
//! prompts are never corrupted.

use std::borrow::Cow;

use crate::models::{ActionSpec, ContextDataBag, ContextType};

use super::vocabulary::{
    ANTI_HALLUCINATION_NUDGE, CONCISENESS_NUDGE, Nudge, TOKEN_PATTERN, TokenKind, lookup,
    no_text_nudge, section_label,
};

/// Marks a token deleted during substitution so the cleanup pass can remove
/// the line it occupied when nothing else is on it.
const DROP_MARK: char = '\u{0}';

/// Template rendering engine.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRenderer {
    _private: (), // Prevent external construction, allow future fields
}

impl PlaceholderRenderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders an action's template against an assembled data bag.
    ///
    /// Never fails; an action without a literal template renders its frame
    /// around an empty body.
    #[must_use]
    pub fn render(&self, action: &ActionSpec, bag: &ContextDataBag) -> String {
        let template = action.template_text().unwrap_or_default();
        let substituted = substitute(template, bag);
        let resolved = resolve_no_text_nudge(&substituted, bag);
        let body = sweep_dropped_lines(&resolved);
        let framed = frame(action.context, &body, bag);
        append_language_directive(framed, template, bag)
    }
}

/// First pass: substitute every recognized token.
///
/// Empty sections and suppressed nudges become drop marks; the no-text nudge
/// is left for the late pass so its condition sees the fully substituted
/// primary text fields.
fn substitute(template: &str, bag: &ContextDataBag) -> String {
    TOKEN_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let Some(spec) = lookup(name) else {
                // Unknown tokens are inert.
                return caps.get(0).map_or("", |m| m.as_str()).to_string();
            };
            match spec.kind {
                TokenKind::Section(field) => {
                    let value = bag.get(field);
                    if value.is_empty() {
                        DROP_MARK.to_string()
                    } else {
                        let label = section_label(field, bag.degraded.annotations);
                        format!("{label}:\n{value}")
                    }
                },
                TokenKind::Raw(field) => bag.get(field).into_owned(),
                TokenKind::Nudge(Nudge::Conciseness) => CONCISENESS_NUDGE.to_string(),
                TokenKind::Nudge(Nudge::AntiHallucination) => {
                    ANTI_HALLUCINATION_NUDGE.to_string()
                },
                // Deferred to the late pass.
                TokenKind::Nudge(Nudge::NoText) => format!("{{{{{name}}}}}"),
            }
        })
        .to_string()
}

/// Late pass: the no-text caution resolves only after everything else, so
/// its wording can reference the already-resolved document title.
fn resolve_no_text_nudge<'a>(text: &'a str, bag: &ContextDataBag) -> Cow<'a, str> {
    if !text.contains("{{no_text_nudge}}") {
        return Cow::from(text);
    }
    let replacement = if bag.has_no_document_text() {
        no_text_nudge(&bag.title)
    } else {
        DROP_MARK.to_string()
    };
    Cow::from(text.replace("{{no_text_nudge}}", &replacement))
}

/// Removes drop marks; a line left holding only whitespace and marks is
/// deleted outright so empty sections leave no blank artifact.
fn sweep_dropped_lines(text: &str) -> String {
    if !text.contains(DROP_MARK) {
        return text.to_string();
    }
    let mut lines: Vec<Cow<'_, str>> = Vec::new();
    for line in text.split_inclusive('\n') {
        if line.contains(DROP_MARK) {
            let stripped: String = line.chars().filter(|&c| c != DROP_MARK).collect();
            if stripped.trim().is_empty() {
                continue;
            }
            lines.push(Cow::from(stripped));
        } else {
            lines.push(Cow::from(line));
        }
    }
    lines.concat()
}

/// Structural framing, chosen solely by the declared context type.
fn frame(context: ContextType, body: &str, bag: &ContextDataBag) -> String {
    match context {
        ContextType::General => body.to_string(),
        ContextType::Highlight => {
            format!("The reader is asking about a highlighted passage.\n\n{body}")
        },
        ContextType::SingleDocument => {
            format!("The reader is asking about the current document.\n\n{body}")
        },
        ContextType::MultiDocument => {
            if bag.item_list.is_empty() {
                format!("The reader is comparing several documents.\n\n{body}")
            } else {
                format!(
                    "The reader is comparing {} documents:\n{}\n\n{body}",
                    bag.item_count, bag.item_list
                )
            }
        },
    }
}

/// Appends a trailing language directive when one is configured and the
/// template never placed the token itself.
fn append_language_directive(prompt: String, template: &str, bag: &ContextDataBag) -> String {
    if bag.response_language.is_empty() || template.contains("{{response_language}}") {
        return prompt;
    }
    format!("{prompt}\n\nRespond in {}.", bag.response_language)
}
