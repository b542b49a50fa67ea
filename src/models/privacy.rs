//! Privacy settings and provider trust.

use serde::{Deserialize, Serialize};

/// Per-channel privacy toggles plus provider identity.
///
/// Book text, annotations, highlights, and notebook sharing are opt-in and
/// default off. Progress and stats sharing are opt-out: `None` means the
/// reader never touched the toggle and the channel stays available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySettings {
    /// Allow sending book text (selection and full document) to providers.
    #[serde(default)]
    pub book_text_extraction: bool,
    /// Allow sending full annotation content (highlight text plus notes).
    #[serde(default)]
    pub annotations_sharing: bool,
    /// Allow sending highlight text only; legacy, lower-fidelity sibling of
    /// `annotations_sharing`.
    #[serde(default)]
    pub highlights_sharing: bool,
    /// Allow sending private notebook content.
    #[serde(default)]
    pub notebook_sharing: bool,
    /// Allow sending reading progress; unset means allowed.
    #[serde(default)]
    pub progress_sharing: Option<bool>,
    /// Allow sending reading statistics; unset means allowed.
    #[serde(default)]
    pub stats_sharing: Option<bool>,
    /// Identifier of the provider the current request targets.
    #[serde(default)]
    pub provider: String,
    /// Providers allowlisted to bypass the global setting half of each gate.
    ///
    /// Trust never substitutes for a per-action capability flag.
    #[serde(default)]
    pub trusted_providers: Vec<String>,
}

impl PrivacySettings {
    /// Creates settings with every opt-in channel disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the current provider is on the trusted allowlist.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        !self.provider.is_empty()
            && self
                .trusted_providers
                .iter()
                .any(|p| p.eq_ignore_ascii_case(&self.provider))
    }

    /// Returns true unless progress sharing was explicitly switched off.
    #[must_use]
    pub const fn progress_allowed(&self) -> bool {
        !matches!(self.progress_sharing, Some(false))
    }

    /// Returns true unless stats sharing was explicitly switched off.
    #[must_use]
    pub const fn stats_allowed(&self) -> bool {
        !matches!(self.stats_sharing, Some(false))
    }

    /// Sets the current provider.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Adds a provider to the trusted allowlist.
    #[must_use]
    pub fn with_trusted(mut self, provider: impl Into<String>) -> Self {
        self.trusted_providers.push(provider.into());
        self
    }

    /// Enables book text extraction.
    #[must_use]
    pub const fn with_book_text(mut self) -> Self {
        self.book_text_extraction = true;
        self
    }

    /// Enables full annotation sharing.
    #[must_use]
    pub const fn with_annotations(mut self) -> Self {
        self.annotations_sharing = true;
        self
    }

    /// Enables highlight-only sharing.
    #[must_use]
    pub const fn with_highlights(mut self) -> Self {
        self.highlights_sharing = true;
        self
    }

    /// Enables notebook sharing.
    #[must_use]
    pub const fn with_notebook(mut self) -> Self {
        self.notebook_sharing = true;
        self
    }
}
