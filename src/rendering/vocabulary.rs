//! The closed placeholder vocabulary.
//!
//! User-authored templates depend on these literal token names, so the set is
//! stable: labeled-section tokens and their raw (unlabeled) equivalents for
//! every data channel, metadata and reading-state tokens, cache/incremental
//! tokens, nudges, and language tokens. Anything not in this table is inert
//! and passes through rendering verbatim.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::Field;

/// Creates a compile-time verified regex wrapped in [`LazyLock`].
macro_rules! lazy_regex {
    ($pattern:expr) => {
        LazyLock::new(|| Regex::new($pattern).unwrap_or_else(|_| unreachable!()))
    };
}

/// Regex pattern for placeholder tokens: `{{token_name}}`.
pub static TOKEN_PATTERN: LazyLock<Regex> = lazy_regex!(r"\{\{(\w+)\}\}");

/// The fixed nudge strings an action can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    /// Ask for a brief answer.
    Conciseness,
    /// Ask the model not to invent unsupported detail.
    AntiHallucination,
    /// Conditional caution that no source text was supplied; resolved last.
    NoText,
}

/// How a recognized token renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Labeled section: `"<Label>:\n<value>"`, or deleted when empty.
    Section(Field),
    /// Bare value for inline embedding inside authored sentences.
    Raw(Field),
    /// A fixed or conditional nudge string.
    Nudge(Nudge),
}

/// One recognized placeholder token.
#[derive(Debug, Clone, Copy)]
pub struct TokenSpec {
    /// The literal token name between the braces.
    pub name: &'static str,
    /// How the token renders.
    pub kind: TokenKind,
}

/// The full stable vocabulary.
///
/// The legacy `highlights` spellings are aliases of the annotations field;
/// which label they render under is decided by the degradation marker, like
/// the canonical spelling.
pub const TOKENS: &[TokenSpec] = &[
    // Labeled sections
    TokenSpec { name: "book_text_section", kind: TokenKind::Section(Field::BookText) },
    TokenSpec { name: "full_document_section", kind: TokenKind::Section(Field::FullDocument) },
    TokenSpec { name: "annotations_section", kind: TokenKind::Section(Field::Annotations) },
    TokenSpec { name: "highlights_section", kind: TokenKind::Section(Field::Annotations) },
    TokenSpec { name: "notebook_section", kind: TokenKind::Section(Field::Notebook) },
    TokenSpec { name: "surrounding_text_section", kind: TokenKind::Section(Field::SurroundingText) },
    TokenSpec { name: "disambiguation_section", kind: TokenKind::Section(Field::Disambiguation) },
    TokenSpec { name: "xray_cache_section", kind: TokenKind::Section(Field::XrayCache) },
    TokenSpec { name: "analyze_cache_section", kind: TokenKind::Section(Field::AnalyzeCache) },
    TokenSpec { name: "summary_cache_section", kind: TokenKind::Section(Field::SummaryCache) },
    // Raw equivalents
    TokenSpec { name: "book_text", kind: TokenKind::Raw(Field::BookText) },
    TokenSpec { name: "full_document", kind: TokenKind::Raw(Field::FullDocument) },
    TokenSpec { name: "annotations", kind: TokenKind::Raw(Field::Annotations) },
    TokenSpec { name: "highlights", kind: TokenKind::Raw(Field::Annotations) },
    TokenSpec { name: "notebook", kind: TokenKind::Raw(Field::Notebook) },
    TokenSpec { name: "surrounding_text", kind: TokenKind::Raw(Field::SurroundingText) },
    TokenSpec { name: "disambiguation", kind: TokenKind::Raw(Field::Disambiguation) },
    TokenSpec { name: "xray_cache", kind: TokenKind::Raw(Field::XrayCache) },
    TokenSpec { name: "analyze_cache", kind: TokenKind::Raw(Field::AnalyzeCache) },
    TokenSpec { name: "summary_cache", kind: TokenKind::Raw(Field::SummaryCache) },
    // Metadata
    TokenSpec { name: "title", kind: TokenKind::Raw(Field::Title) },
    TokenSpec { name: "author", kind: TokenKind::Raw(Field::Author) },
    TokenSpec { name: "author_clause", kind: TokenKind::Raw(Field::AuthorClause) },
    TokenSpec { name: "item_count", kind: TokenKind::Raw(Field::ItemCount) },
    TokenSpec { name: "item_list", kind: TokenKind::Raw(Field::ItemList) },
    // Reading state
    TokenSpec { name: "progress_percent", kind: TokenKind::Raw(Field::ProgressPercent) },
    TokenSpec { name: "progress_decimal", kind: TokenKind::Raw(Field::ProgressDecimal) },
    TokenSpec { name: "chapter_title", kind: TokenKind::Raw(Field::ChapterTitle) },
    TokenSpec { name: "chapters_read", kind: TokenKind::Raw(Field::ChaptersRead) },
    TokenSpec { name: "time_since_last_read", kind: TokenKind::Raw(Field::TimeSinceLastRead) },
    // Cache / incremental
    TokenSpec { name: "previous_result", kind: TokenKind::Raw(Field::PreviousResult) },
    TokenSpec { name: "previous_progress", kind: TokenKind::Raw(Field::PreviousProgress) },
    TokenSpec { name: "incremental_text", kind: TokenKind::Raw(Field::IncrementalText) },
    // Nudges
    TokenSpec { name: "conciseness_nudge", kind: TokenKind::Nudge(Nudge::Conciseness) },
    TokenSpec { name: "anti_hallucination_nudge", kind: TokenKind::Nudge(Nudge::AntiHallucination) },
    TokenSpec { name: "no_text_nudge", kind: TokenKind::Nudge(Nudge::NoText) },
    // Languages
    TokenSpec { name: "response_language", kind: TokenKind::Raw(Field::ResponseLanguage) },
    TokenSpec { name: "dictionary_language", kind: TokenKind::Raw(Field::DictionaryLanguage) },
];

/// Looks up a token by its literal name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static TokenSpec> {
    TOKENS.iter().find(|t| t.name == name)
}

/// Returns the token names appearing in a template, in order of appearance.
#[must_use]
pub fn scan_tokens(template: &str) -> Vec<&str> {
    TOKEN_PATTERN
        .captures_iter(template)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Returns the set of fields a template references, section or raw.
#[must_use]
pub fn referenced_fields(template: &str) -> HashSet<Field> {
    scan_tokens(template)
        .into_iter()
        .filter_map(lookup)
        .filter_map(|spec| match spec.kind {
            TokenKind::Section(field) | TokenKind::Raw(field) => Some(field),
            TokenKind::Nudge(_) => None,
        })
        .collect()
}

/// Returns the section label for a field.
///
/// Exactly one label is dynamic: the annotations section reads
/// "Highlights so far" when the annotations channel was degraded.
#[must_use]
pub const fn section_label(field: Field, annotations_degraded: bool) -> &'static str {
    match field {
        Field::Annotations if annotations_degraded => "Highlights so far",
        Field::Annotations => "Annotations",
        Field::BookText => "Book text",
        Field::FullDocument => "Full document text",
        Field::Notebook => "Private notes",
        Field::SurroundingText => "Surrounding text",
        Field::Disambiguation => "Additional context",
        Field::XrayCache => "X-Ray so far",
        Field::AnalyzeCache => "Prior analysis",
        Field::SummaryCache => "Summary so far",
        _ => "Context",
    }
}

/// Fixed conciseness nudge.
pub const CONCISENESS_NUDGE: &str =
    "Keep the answer short and to the point; skip preamble and repetition.";

/// Fixed anti-hallucination nudge.
pub const ANTI_HALLUCINATION_NUDGE: &str =
    "If the supplied material does not support a claim, say you cannot tell instead of guessing.";

/// Conditional no-text caution, worded against the already-resolved title.
#[must_use]
pub fn no_text_nudge(title: &str) -> String {
    if title.is_empty() {
        "Note: no text from the document was supplied with this request; answer from general knowledge and say so.".to_string()
    } else {
        format!(
            "Note: no text from \"{title}\" was supplied with this request; answer from general knowledge and say so."
        )
    }
}
