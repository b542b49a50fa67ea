//! Per-request context data.
//!
//! The [`ContextDataBag`] is the flat mapping from field name to resolved
//! text that the renderer substitutes into a template. It is built fresh for
//! every request, after permission resolution, and discarded once the prompt
//! string exists. Degradation markers and withhold reasons ride along as
//! explicit side structures; the reason list is purely for user-facing
//! transparency and never drives control flow.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use super::cache::CacheKind;

/// A named category of personal data subject to its own permission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Selected or surrounding book text.
    BookText,
    /// The full document text.
    FullDocument,
    /// Annotation content (highlight text plus notes).
    Annotations,
    /// Highlight text only; the degraded sibling of annotations.
    Highlights,
    /// Private notebook content.
    Notebook,
    /// Reading progress.
    Progress,
    /// Reading statistics.
    Stats,
    /// A named analysis cache.
    Cache(CacheKind),
}

impl Channel {
    /// Returns the user-facing channel name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BookText => "book text",
            Self::FullDocument => "full document",
            Self::Annotations => "annotations",
            Self::Highlights => "highlights",
            Self::Notebook => "notebook",
            Self::Progress => "progress",
            Self::Stats => "reading stats",
            Self::Cache(CacheKind::Xray) => "xray cache",
            Self::Cache(CacheKind::Analyze) => "analyze cache",
            Self::Cache(CacheKind::Summary) => "summary cache",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a channel contributed nothing to the request.
///
/// Rendered for the reader so a thin prompt is explainable; never consulted
/// by the pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The channel's sharing setting is off and the provider is not trusted.
    SharingDisabled(Channel),
    /// The channel was permitted but the document had no such content.
    NoneFound(Channel),
    /// Full annotations were withheld; highlight text was served instead.
    UsingHighlightsOnly,
    /// The cache was requested but has not been built yet.
    CacheMissing(CacheKind),
    /// The cache exists but its provenance requires a permission that no
    /// longer holds.
    CacheLocked(CacheKind),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharingDisabled(channel) => write!(f, "{channel} (sharing disabled)"),
            Self::NoneFound(channel) => write!(f, "{channel} (none found)"),
            Self::UsingHighlightsOnly => write!(f, "annotations (using highlights only)"),
            Self::CacheMissing(kind) => write!(f, "{kind} cache (not built yet)"),
            Self::CacheLocked(kind) => write!(f, "{kind} cache (privacy settings changed)"),
        }
    }
}

/// Markers for channels that fell back to a lower-fidelity source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegradationMarkers {
    /// The annotations field holds highlight-only text.
    pub annotations: bool,
}

/// The enumerated key set of the data bag.
///
/// One variant per known field; the renderer's token table maps placeholder
/// names onto these keys, so every branch is statically checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Selected book text.
    BookText,
    /// Full document text.
    FullDocument,
    /// Annotation content, possibly degraded to highlights.
    Annotations,
    /// Private notebook content.
    Notebook,
    /// Text surrounding the current highlight.
    SurroundingText,
    /// Disambiguation context supplied with the selection.
    Disambiguation,
    /// X-Ray cache content.
    XrayCache,
    /// Analyze cache content.
    AnalyzeCache,
    /// Summary cache content.
    SummaryCache,
    /// Document title.
    Title,
    /// Document author.
    Author,
    /// `" by <author>"`, or empty when the author is unknown.
    AuthorClause,
    /// Number of items in a multi-document context.
    ItemCount,
    /// Listing of the items in a multi-document context.
    ItemList,
    /// Reading progress as a percentage string.
    ProgressPercent,
    /// Reading progress as a decimal fraction string.
    ProgressDecimal,
    /// Title of the current chapter.
    ChapterTitle,
    /// Number of chapters read.
    ChaptersRead,
    /// Time since the document was last read.
    TimeSinceLastRead,
    /// Cached prior result of this action.
    PreviousResult,
    /// Progress marker of the cached prior result.
    PreviousProgress,
    /// Text read since the last analysis pass.
    IncrementalText,
    /// Target language for the response.
    ResponseLanguage,
    /// Language for dictionary-style definitions.
    DictionaryLanguage,
}

/// Per-request field values plus degradation and withhold side-channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextDataBag {
    /// Selected book text.
    pub book_text: String,
    /// Full document text.
    pub full_document: String,
    /// Annotation content; highlight-only when degraded.
    pub annotations: String,
    /// Private notebook content.
    pub notebook: String,
    /// Text surrounding the current highlight.
    pub surrounding_text: String,
    /// Disambiguation context supplied with the selection.
    pub disambiguation: String,
    /// X-Ray cache content.
    pub xray_cache: String,
    /// Analyze cache content.
    pub analyze_cache: String,
    /// Summary cache content.
    pub summary_cache: String,
    /// Document title.
    pub title: String,
    /// Document author.
    pub author: String,
    /// Item count for multi-document contexts.
    pub item_count: String,
    /// Item listing for multi-document contexts.
    pub item_list: String,
    /// Reading progress percentage, e.g. `"63%"`.
    pub progress_percent: String,
    /// Reading progress fraction, e.g. `"0.63"`.
    pub progress_decimal: String,
    /// Current chapter title.
    pub chapter_title: String,
    /// Chapters read so far.
    pub chapters_read: String,
    /// Time since last read, e.g. `"2 days"`.
    pub time_since_last_read: String,
    /// Cached prior result of this action.
    pub previous_result: String,
    /// Progress marker of the cached prior result.
    pub previous_progress: String,
    /// Text read since the last analysis pass.
    pub incremental_text: String,
    /// Target response language.
    pub response_language: String,
    /// Dictionary/definition language.
    pub dictionary_language: String,
    /// Channels that fell back to a lower-fidelity source.
    #[serde(skip)]
    pub degraded: DegradationMarkers,
    /// Ordered withhold reasons for user-facing transparency.
    #[serde(skip)]
    pub unavailable: Vec<UnavailableReason>,
}

impl ContextDataBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolved text for a field.
    ///
    /// `AuthorClause` is computed from the author field; everything else is
    /// a direct lookup.
    #[must_use]
    pub fn get(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::BookText => Cow::from(&self.book_text),
            Field::FullDocument => Cow::from(&self.full_document),
            Field::Annotations => Cow::from(&self.annotations),
            Field::Notebook => Cow::from(&self.notebook),
            Field::SurroundingText => Cow::from(&self.surrounding_text),
            Field::Disambiguation => Cow::from(&self.disambiguation),
            Field::XrayCache => Cow::from(&self.xray_cache),
            Field::AnalyzeCache => Cow::from(&self.analyze_cache),
            Field::SummaryCache => Cow::from(&self.summary_cache),
            Field::Title => Cow::from(&self.title),
            Field::Author => Cow::from(&self.author),
            Field::AuthorClause => {
                if self.author.is_empty() {
                    Cow::from("")
                } else {
                    Cow::from(format!(" by {}", self.author))
                }
            },
            Field::ItemCount => Cow::from(&self.item_count),
            Field::ItemList => Cow::from(&self.item_list),
            Field::ProgressPercent => Cow::from(&self.progress_percent),
            Field::ProgressDecimal => Cow::from(&self.progress_decimal),
            Field::ChapterTitle => Cow::from(&self.chapter_title),
            Field::ChaptersRead => Cow::from(&self.chapters_read),
            Field::TimeSinceLastRead => Cow::from(&self.time_since_last_read),
            Field::PreviousResult => Cow::from(&self.previous_result),
            Field::PreviousProgress => Cow::from(&self.previous_progress),
            Field::IncrementalText => Cow::from(&self.incremental_text),
            Field::ResponseLanguage => Cow::from(&self.response_language),
            Field::DictionaryLanguage => Cow::from(&self.dictionary_language),
        }
    }

    /// True when the primary document-text fields are both empty.
    ///
    /// Drives the conditional no-text nudge.
    #[must_use]
    pub fn has_no_document_text(&self) -> bool {
        self.book_text.is_empty() && self.full_document.is_empty()
    }

    /// Joins the withhold reasons into the user-facing transparency string.
    #[must_use]
    pub fn unavailable_summary(&self) -> String {
        self.unavailable
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_clause_is_computed() {
        let mut bag = ContextDataBag::new();
        assert_eq!(bag.get(Field::AuthorClause), "");

        bag.author = "Jane Austen".to_string();
        assert_eq!(bag.get(Field::AuthorClause), " by Jane Austen");
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            UnavailableReason::SharingDisabled(Channel::Annotations).to_string(),
            "annotations (sharing disabled)"
        );
        assert_eq!(
            UnavailableReason::NoneFound(Channel::Highlights).to_string(),
            "highlights (none found)"
        );
        assert_eq!(
            UnavailableReason::UsingHighlightsOnly.to_string(),
            "annotations (using highlights only)"
        );
        assert_eq!(
            UnavailableReason::CacheMissing(CacheKind::Xray).to_string(),
            "xray cache (not built yet)"
        );
    }

    #[test]
    fn test_unavailable_summary_preserves_order() {
        let bag = ContextDataBag {
            unavailable: vec![
                UnavailableReason::SharingDisabled(Channel::Annotations),
                UnavailableReason::NoneFound(Channel::Notebook),
            ],
            ..ContextDataBag::new()
        };
        assert_eq!(
            bag.unavailable_summary(),
            "annotations (sharing disabled), notebook (none found)"
        );
    }

    #[test]
    fn test_no_document_text() {
        let mut bag = ContextDataBag::new();
        assert!(bag.has_no_document_text());
        bag.full_document = "text".to_string();
        assert!(!bag.has_no_document_text());
    }
}
