//! Cached analysis records and their provenance.
//!
//! A cache record's own provenance flags, not the requesting action's flags,
//! gate its re-use: a cache built from book text stays locked while book text
//! sharing is off, even for an action that never asks for book text itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The named analysis caches an action can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// Cumulative X-Ray of the document (entities, built from text and
    /// annotations).
    Xray,
    /// Prior deep-analysis result.
    Analyze,
    /// Prior running summary.
    Summary,
}

impl CacheKind {
    /// Returns all cache kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Xray, Self::Analyze, Self::Summary]
    }

    /// Returns the cache kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xray => "xray",
            Self::Analyze => "analyze",
            Self::Summary => "summary",
        }
    }

    /// Parses a cache kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "xray" | "x-ray" => Some(Self::Xray),
            "analyze" => Some(Self::Analyze),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }

    /// Whether this kind of cache is declared to contain annotation or
    /// highlight material, making its capability inference cascade to the
    /// annotations flag.
    #[must_use]
    pub const fn carries_annotations(&self) -> bool {
        matches!(self, Self::Xray)
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cached prior analysis plus the provenance of its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The cached analysis text.
    pub content: String,
    /// Whether book text went into this cache; unset is treated as true.
    #[serde(default)]
    pub used_book_text: Option<bool>,
    /// Whether full annotation content went into this cache.
    #[serde(default)]
    pub used_annotations: Option<bool>,
    /// Legacy provenance field: whether highlight text went into this cache.
    #[serde(default)]
    pub used_highlights: Option<bool>,
    /// Coverage marker, e.g. the reading progress when the cache was built.
    #[serde(default)]
    pub progress: Option<String>,
}

impl CacheRecord {
    /// Creates a record with the given content and no provenance.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Declares the record's provenance.
    #[must_use]
    pub const fn with_provenance(mut self, book_text: bool, annotations: bool) -> Self {
        self.used_book_text = Some(book_text);
        self.used_annotations = Some(annotations);
        self
    }

    /// Whether re-using this cache requires book text permission.
    ///
    /// An unset field defaults to the strictest case.
    #[must_use]
    pub fn needs_book_text(&self) -> bool {
        self.used_book_text.unwrap_or(true)
    }

    /// Whether re-using this cache requires annotation or highlight
    /// permission.
    ///
    /// The modern `used_annotations` field wins; records written before it
    /// existed may carry only `used_highlights`. A record with neither is
    /// treated as if it required the permission.
    #[must_use]
    pub fn needs_annotations(&self) -> bool {
        self.used_annotations
            .or(self.used_highlights)
            .unwrap_or(true)
    }
}
