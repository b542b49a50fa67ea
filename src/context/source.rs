//! The extraction collaborator interface.
//!
//! Implementations adapt a host reading application. The assembler only
//! calls a method once the corresponding channel is permitted, so an adapter
//! never has to re-check privacy itself and unapproved channels are never
//! even queried.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{CacheKind, CacheRecord};

/// Reading-progress data for the open document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingState {
    /// Progress through the document, 0.0 to 100.0.
    pub percent: f64,
    /// Title of the current chapter.
    #[serde(default)]
    pub chapter_title: String,
    /// Number of chapters read so far.
    #[serde(default)]
    pub chapters_read: u32,
}

/// Reading statistics for the open document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingStats {
    /// Human-readable time since the document was last read, e.g. `"2 days"`.
    #[serde(default)]
    pub time_since_last_read: String,
}

/// Raw data access into the host reading application.
///
/// Only `title` is required; every other channel defaults to absent so thin
/// adapters stay thin. Absence is normal and never an error.
pub trait DocumentSource {
    /// Document title.
    fn title(&self) -> String;

    /// Document author, when known.
    fn author(&self) -> String {
        String::new()
    }

    /// Whether a document is currently open.
    fn is_open(&self) -> bool {
        true
    }

    /// The selected or highlighted book text.
    fn book_text(&self) -> String {
        String::new()
    }

    /// The full document text.
    fn full_document(&self) -> String {
        String::new()
    }

    /// Full annotation content: highlight text plus the reader's notes.
    fn annotations(&self) -> String {
        String::new()
    }

    /// Highlight text only; the degraded sibling of `annotations`.
    fn highlights(&self) -> String {
        String::new()
    }

    /// Private notebook content for this document.
    fn notebook(&self) -> String {
        String::new()
    }

    /// Text surrounding the current highlight.
    fn surrounding_text(&self) -> String {
        String::new()
    }

    /// Disambiguation context supplied with the selection.
    fn disambiguation(&self) -> String {
        String::new()
    }

    /// Text read since the last analysis pass.
    fn incremental_text(&self) -> String {
        String::new()
    }

    /// Reading progress, when a document is open.
    fn reading_state(&self) -> Option<ReadingState> {
        None
    }

    /// Reading statistics, when tracked.
    fn stats(&self) -> Option<ReadingStats> {
        None
    }

    /// The stored record of a named cache, when one has been built.
    fn cache(&self, kind: CacheKind) -> Option<CacheRecord> {
        let _ = kind;
        None
    }

    /// Titles of the documents in a multi-document context.
    fn items(&self) -> Vec<String> {
        Vec::new()
    }
}

const fn default_open() -> bool {
    true
}

/// A [`DocumentSource`] over a JSON snapshot of extraction values.
///
/// Used by the CLI and by integration fixtures; a host application can also
/// hand one over instead of implementing the trait itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSource {
    /// Document title.
    #[serde(default)]
    pub title: String,
    /// Document author.
    #[serde(default)]
    pub author: String,
    /// Whether a document is open; defaults to true.
    #[serde(default = "default_open")]
    pub open: bool,
    /// Selected book text.
    #[serde(default)]
    pub book_text: String,
    /// Full document text.
    #[serde(default)]
    pub full_document: String,
    /// Full annotation content.
    #[serde(default)]
    pub annotations: String,
    /// Highlight text only.
    #[serde(default)]
    pub highlights: String,
    /// Private notebook content.
    #[serde(default)]
    pub notebook: String,
    /// Text surrounding the highlight.
    #[serde(default)]
    pub surrounding_text: String,
    /// Disambiguation context.
    #[serde(default)]
    pub disambiguation: String,
    /// Text read since the last pass.
    #[serde(default)]
    pub incremental_text: String,
    /// Reading progress.
    #[serde(default)]
    pub reading_state: Option<ReadingState>,
    /// Reading statistics.
    #[serde(default)]
    pub stats: Option<ReadingStats>,
    /// Built caches by kind.
    #[serde(default)]
    pub caches: HashMap<CacheKind, CacheRecord>,
    /// Multi-document item titles.
    #[serde(default)]
    pub items: Vec<String>,
}

impl Default for SnapshotSource {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            open: default_open(),
            book_text: String::new(),
            full_document: String::new(),
            annotations: String::new(),
            highlights: String::new(),
            notebook: String::new(),
            surrounding_text: String::new(),
            disambiguation: String::new(),
            incremental_text: String::new(),
            reading_state: None,
            stats: None,
            caches: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl DocumentSource for SnapshotSource {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn author(&self) -> String {
        self.author.clone()
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn book_text(&self) -> String {
        self.book_text.clone()
    }

    fn full_document(&self) -> String {
        self.full_document.clone()
    }

    fn annotations(&self) -> String {
        self.annotations.clone()
    }

    fn highlights(&self) -> String {
        self.highlights.clone()
    }

    fn notebook(&self) -> String {
        self.notebook.clone()
    }

    fn surrounding_text(&self) -> String {
        self.surrounding_text.clone()
    }

    fn disambiguation(&self) -> String {
        self.disambiguation.clone()
    }

    fn incremental_text(&self) -> String {
        self.incremental_text.clone()
    }

    fn reading_state(&self) -> Option<ReadingState> {
        self.reading_state.clone()
    }

    fn stats(&self) -> Option<ReadingStats> {
        self.stats.clone()
    }

    fn cache(&self, kind: CacheKind) -> Option<CacheRecord> {
        self.caches.get(&kind).cloned()
    }

    fn items(&self) -> Vec<String> {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults_open() {
        let source: SnapshotSource = serde_json::from_str(r#"{"title": "Emma"}"#).unwrap();
        assert!(source.is_open());
        assert_eq!(source.title(), "Emma");
        assert!(source.cache(CacheKind::Xray).is_none());
    }

    #[test]
    fn test_snapshot_caches_by_kind() {
        let source: SnapshotSource = serde_json::from_str(
            r#"{
                "title": "Emma",
                "caches": {
                    "xray": {"content": "Emma Woodhouse: protagonist", "used_book_text": true}
                }
            }"#,
        )
        .unwrap();
        let record = source.cache(CacheKind::Xray).unwrap();
        assert_eq!(record.content, "Emma Woodhouse: protagonist");
        assert!(source.cache(CacheKind::Summary).is_none());
    }
}
