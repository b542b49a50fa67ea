//! Action specifications.
//!
//! An action is one assistant feature a reader can invoke ("explain this
//! highlight", "summarize so far", "build the X-Ray"). Actions are authored
//! in a catalog outside this crate and loaded as immutable records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gating::CapabilityFlags;

/// The structural context an action operates in.
///
/// Framing of the rendered prompt is chosen solely by this type, independent
/// of which placeholders the template happens to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextType {
    /// A single highlighted passage in the open document.
    Highlight,
    /// The currently open document as a whole.
    #[serde(alias = "single_document", alias = "document")]
    SingleDocument,
    /// Several documents compared side by side.
    #[serde(alias = "multi_document")]
    MultiDocument,
    /// No document context; a free-standing request.
    #[default]
    General,
}

impl ContextType {
    /// Returns all context type variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Highlight,
            Self::SingleDocument,
            Self::MultiDocument,
            Self::General,
        ]
    }

    /// Returns the context type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::SingleDocument => "single-document",
            Self::MultiDocument => "multi-document",
            Self::General => "general",
        }
    }

    /// Parses a context type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "highlight" => Some(Self::Highlight),
            "single-document" | "single_document" | "document" => Some(Self::SingleDocument),
            "multi-document" | "multi_document" => Some(Self::MultiDocument),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A coarse semantic requirement an action declares on its inputs.
///
/// Requirements are checked after assembly against what actually landed in
/// the data bag; a failed requirement is reported to the caller, never raised
/// as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// The action needs book text (selection or full document).
    BookText,
    /// The action needs annotation or highlight content.
    Annotations,
    /// The action needs private notebook content.
    Notebook,
    /// The action needs the document author.
    Author,
    /// The action needs reading-state data (progress, chapter).
    ReadingState,
}

impl Requirement {
    /// Returns the requirement as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BookText => "book_text",
            Self::Annotations => "annotations",
            Self::Notebook => "notebook",
            Self::Author => "author",
            Self::ReadingState => "reading_state",
        }
    }

    /// Parses a requirement from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "book_text" | "book-text" => Some(Self::BookText),
            "annotations" | "highlights" => Some(Self::Annotations),
            "notebook" => Some(Self::Notebook),
            "author" => Some(Self::Author),
            "reading_state" | "reading-state" => Some(Self::ReadingState),
            _ => None,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One assistant action from the catalog.
///
/// Immutable once loaded. Carries either a literal template or a reference
/// into an externally stored template catalog, plus optional explicit
/// capability flags. Actions without explicit flags (legacy and hand-authored
/// ones) have their flags inferred from the template text once, at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Unique action identifier.
    pub id: String,
    /// The structural context this action operates in.
    #[serde(default)]
    pub context: ContextType,
    /// Literal prompt template with `{{placeholder}}` tokens.
    #[serde(default)]
    pub template: Option<String>,
    /// Reference into the external template catalog.
    #[serde(default)]
    pub template_ref: Option<String>,
    /// Explicit capability flags; inferred from the template when absent.
    #[serde(default)]
    pub flags: Option<CapabilityFlags>,
    /// Coarse semantic requirements on the assembled data.
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

impl ActionSpec {
    /// Creates an action with a literal template.
    #[must_use]
    pub fn with_template(id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template: Some(template.into()),
            ..Self::default()
        }
    }

    /// Sets the context type.
    #[must_use]
    pub const fn in_context(mut self, context: ContextType) -> Self {
        self.context = context;
        self
    }

    /// Sets explicit capability flags.
    #[must_use]
    pub fn with_flags(mut self, flags: CapabilityFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Returns the literal template text, if the action carries one.
    #[must_use]
    pub fn template_text(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Returns the action's effective capability flags.
    ///
    /// Explicit flags win; otherwise the flags are inferred from the literal
    /// template text. An action with neither a template nor explicit flags
    /// gets an all-off flag set, which withholds every gated channel.
    #[must_use]
    pub fn capabilities(&self) -> CapabilityFlags {
        self.flags.unwrap_or_else(|| {
            CapabilityFlags::infer(self.template_text().unwrap_or_default())
        })
    }
}
