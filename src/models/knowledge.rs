//! Cumulative document knowledge.
//!
//! A [`KnowledgeDocument`] accumulates structured knowledge about one
//! document across repeated analysis passes. Fiction and nonfiction use
//! different vocabulary for conceptually equivalent roles (characters vs.
//! key figures, timeline vs. argument development); the model is named by
//! role so merge logic dispatches on structural shape, and serde aliases
//! accept either spelling on input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The genre discriminant of a knowledge document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Narrative works: characters, locations, themes, timeline.
    Fiction,
    /// Expository works: key figures, core concepts, argument development.
    Nonfiction,
}

impl DocumentKind {
    /// Returns the kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fiction => "fiction",
            Self::Nonfiction => "nonfiction",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The list-category roles shared by both document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListCategory {
    /// Characters (fiction) or key figures (nonfiction).
    Figures,
    /// Places that matter to the document.
    Locations,
    /// Themes (fiction) or core concepts (nonfiction).
    Concepts,
    /// Lexicon (fiction) or terminology (nonfiction).
    Lexicon,
}

impl ListCategory {
    /// Returns all list-category roles.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Figures, Self::Locations, Self::Concepts, Self::Lexicon]
    }

    /// Returns the category label in the given kind's vocabulary.
    #[must_use]
    pub const fn label(&self, kind: Option<DocumentKind>) -> &'static str {
        match (self, kind) {
            (Self::Figures, Some(DocumentKind::Nonfiction)) => "Key figures",
            (Self::Figures, _) => "Characters",
            (Self::Locations, _) => "Locations",
            (Self::Concepts, Some(DocumentKind::Nonfiction)) => "Core concepts",
            (Self::Concepts, _) => "Themes",
            (Self::Lexicon, Some(DocumentKind::Nonfiction)) => "Terminology",
            (Self::Lexicon, _) => "Lexicon",
        }
    }
}

/// A named entity in a list category.
///
/// Entries are unique by case-insensitive name within their category after
/// any merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEntry {
    /// Canonical name.
    pub name: String,
    /// Alternative names and spellings seen in the text.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Free-form description accumulated so far.
    #[serde(default)]
    pub description: String,
}

impl EntityEntry {
    /// Creates an entry with a name and description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: description.into(),
        }
    }

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// An ordered event in the pure-append category.
///
/// Events have no identity key and are never deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    /// Short name of the event or argument step.
    pub summary: String,
    /// Optional longer description.
    #[serde(default)]
    pub detail: Option<String>,
}

impl EventEntry {
    /// Creates an event with a summary only.
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: None,
        }
    }
}

/// The singleton current-state summary, replaced wholesale on every merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    /// Free-form summary of where the story or argument currently stands.
    pub summary: String,
    /// Optional position marker (chapter, section, progress).
    #[serde(default)]
    pub position: Option<String>,
}

/// Cumulative structured knowledge about one document.
///
/// Persisted indefinitely by the caller and only ever replaced atomically by
/// a merge result, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    /// Genre discriminant; retained once set.
    #[serde(default)]
    pub kind: Option<DocumentKind>,
    /// Characters or key figures.
    #[serde(default, alias = "characters", alias = "key_figures")]
    pub figures: Option<Vec<EntityEntry>>,
    /// Locations.
    #[serde(default)]
    pub locations: Option<Vec<EntityEntry>>,
    /// Themes or core concepts.
    #[serde(default, alias = "themes", alias = "core_concepts")]
    pub concepts: Option<Vec<EntityEntry>>,
    /// Lexicon or terminology.
    #[serde(default, alias = "terminology")]
    pub lexicon: Option<Vec<EntityEntry>>,
    /// Timeline or argument development; pure append, never deduplicated.
    #[serde(default, alias = "timeline", alias = "argument_development")]
    pub events: Option<Vec<EventEntry>>,
    /// Current state or current position; singleton.
    #[serde(default, alias = "current_state", alias = "current_position")]
    pub state: Option<StateSummary>,
    /// Reader-engagement summary; optional singleton.
    #[serde(default, alias = "reader_engagement")]
    pub engagement: Option<String>,
}

impl KnowledgeDocument {
    /// Creates an empty knowledge document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entries of a list category, if present.
    #[must_use]
    pub fn list(&self, category: ListCategory) -> Option<&[EntityEntry]> {
        match category {
            ListCategory::Figures => self.figures.as_deref(),
            ListCategory::Locations => self.locations.as_deref(),
            ListCategory::Concepts => self.concepts.as_deref(),
            ListCategory::Lexicon => self.lexicon.as_deref(),
        }
    }

    /// Returns true if no category is present at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.figures.is_none()
            && self.locations.is_none()
            && self.concepts.is_none()
            && self.lexicon.is_none()
            && self.events.is_none()
            && self.state.is_none()
            && self.engagement.is_none()
    }

    /// Returns the events label in this document's vocabulary.
    #[must_use]
    pub const fn events_label(&self) -> &'static str {
        match self.kind {
            Some(DocumentKind::Nonfiction) => "Argument development",
            _ => "Timeline",
        }
    }
}
