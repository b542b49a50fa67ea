//! Capability flags and their inference from template text.
//!
//! Inference exists to migrate legacy and hand-authored actions that omit
//! explicit flags: it runs once per action, at load time, over the literal
//! template text, and produces this typed value object. Request-time code
//! never re-scans text.

use serde::{Deserialize, Serialize};

use crate::models::CacheKind;
use crate::rendering::vocabulary::scan_tokens;

/// The per-action capability flags.
///
/// `use_book_text`, `use_annotations`, and `use_notebook` form the action
/// half of a double gate; the privacy settings (or provider trust) form the
/// other half. Cache flags gate the named caches, whose re-use additionally
/// depends on the cache record's own provenance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFlags {
    /// The action sends book text (selection, surrounding, or full document).
    #[serde(default)]
    pub use_book_text: bool,
    /// The action sends annotation or highlight content.
    #[serde(default)]
    pub use_annotations: bool,
    /// The action sends private notebook content.
    #[serde(default)]
    pub use_notebook: bool,
    /// The action wants reading progress data.
    #[serde(default)]
    pub use_reading_progress: bool,
    /// The action wants reading statistics.
    #[serde(default)]
    pub use_reading_stats: bool,
    /// The action re-uses the X-Ray cache.
    #[serde(default)]
    pub use_xray_cache: bool,
    /// The action re-uses the analyze cache.
    #[serde(default)]
    pub use_analyze_cache: bool,
    /// The action re-uses the summary cache.
    #[serde(default)]
    pub use_summary_cache: bool,
}

impl CapabilityFlags {
    /// Creates an all-off flag set.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns the flag for a named cache.
    #[must_use]
    pub const fn cache(&self, kind: CacheKind) -> bool {
        match kind {
            CacheKind::Xray => self.use_xray_cache,
            CacheKind::Analyze => self.use_analyze_cache,
            CacheKind::Summary => self.use_summary_cache,
        }
    }

    /// Infers the flags an action implicitly requires from its template.
    ///
    /// Recognized tokens map to their channel's flag; cache tokens cascade
    /// to `use_book_text`, and — only for caches whose declared provenance
    /// includes annotation/highlight content — to `use_annotations`. The
    /// double-gated flags are set only by their own canonical token family,
    /// so an unrelated placeholder in a custom action can never silently
    /// widen its privacy exposure. Unknown tokens contribute nothing.
    #[must_use]
    pub fn infer(template: &str) -> Self {
        let mut flags = Self::none();
        for token in scan_tokens(template) {
            match token {
                "book_text" | "book_text_section" | "full_document" | "full_document_section"
                | "surrounding_text" | "surrounding_text_section" | "incremental_text" => {
                    flags.use_book_text = true;
                },
                "annotations" | "annotations_section" | "annotation" | "highlights"
                | "highlights_section" | "highlight" => {
                    flags.use_annotations = true;
                },
                "notebook" | "notebook_section" => {
                    flags.use_notebook = true;
                },
                "progress_percent" | "progress_decimal" | "chapter_title" | "chapters_read" => {
                    flags.use_reading_progress = true;
                },
                "time_since_last_read" => {
                    flags.use_reading_stats = true;
                },
                "xray_cache" | "xray_cache_section" => {
                    flags.add_cache(CacheKind::Xray);
                },
                "analyze_cache" | "analyze_cache_section" => {
                    flags.add_cache(CacheKind::Analyze);
                },
                "summary_cache" | "summary_cache_section" => {
                    flags.add_cache(CacheKind::Summary);
                },
                _ => {},
            }
        }
        flags
    }

    /// Sets a cache flag along with its cascades.
    fn add_cache(&mut self, kind: CacheKind) {
        match kind {
            CacheKind::Xray => self.use_xray_cache = true,
            CacheKind::Analyze => self.use_analyze_cache = true,
            CacheKind::Summary => self.use_summary_cache = true,
        }
        // A cache is built from book text; requesting it implies requesting
        // the text it was built from.
        self.use_book_text = true;
        if kind.carries_annotations() {
            self.use_annotations = true;
        }
    }

    /// Enables the book text flag.
    #[must_use]
    pub const fn with_book_text(mut self) -> Self {
        self.use_book_text = true;
        self
    }

    /// Enables the annotations flag.
    #[must_use]
    pub const fn with_annotations(mut self) -> Self {
        self.use_annotations = true;
        self
    }

    /// Enables the notebook flag.
    #[must_use]
    pub const fn with_notebook(mut self) -> Self {
        self.use_notebook = true;
        self
    }

    /// Enables a cache flag with its cascades.
    #[must_use]
    pub fn with_cache(mut self, kind: CacheKind) -> Self {
        self.add_cache(kind);
        self
    }
}
