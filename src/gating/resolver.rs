//! Per-channel permission decisions.
//!
//! Every decision is the conjunction of two independent halves: the action's
//! capability flag and the reader's global setting. Provider trust can stand
//! in for the setting half, never for the flag half — an action that does not
//! declare a channel never receives it, no matter how trusted the provider.

use tracing::debug;

use crate::models::{
    CacheKind, CacheRecord, Channel, PrivacySettings, UnavailableReason,
};

use super::CapabilityFlags;

/// Outcome of resolving one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDecision {
    /// The channel may contribute content to the request.
    pub allowed: bool,
    /// A lower-fidelity substitute is being served.
    pub degraded: bool,
    /// Why the channel was withheld or degraded, when worth telling the
    /// reader. Channels the action never asked for stay silent.
    pub reason: Option<UnavailableReason>,
}

impl ChannelDecision {
    /// Full access.
    #[must_use]
    pub const fn allowed() -> Self {
        Self {
            allowed: true,
            degraded: false,
            reason: None,
        }
    }

    /// Degraded access with the reason recorded.
    #[must_use]
    pub const fn degraded(reason: UnavailableReason) -> Self {
        Self {
            allowed: true,
            degraded: true,
            reason: Some(reason),
        }
    }

    /// Withheld with a user-facing reason.
    #[must_use]
    pub const fn withheld(reason: UnavailableReason) -> Self {
        Self {
            allowed: false,
            degraded: false,
            reason: Some(reason),
        }
    }

    /// Withheld silently (the action never requested the channel).
    #[must_use]
    pub const fn not_requested() -> Self {
        Self {
            allowed: false,
            degraded: false,
            reason: None,
        }
    }
}

/// Resolves channel permissions for one request.
#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver<'a> {
    settings: &'a PrivacySettings,
}

impl<'a> PermissionResolver<'a> {
    /// Creates a resolver over the reader's privacy settings.
    #[must_use]
    pub const fn new(settings: &'a PrivacySettings) -> Self {
        Self { settings }
    }

    /// The global half of the book text gate: setting or trust.
    #[must_use]
    pub fn book_text_globally_permitted(&self) -> bool {
        self.settings.book_text_extraction || self.settings.is_trusted()
    }

    /// The global half of the annotation/highlight gate: either sharing
    /// setting, or trust.
    #[must_use]
    pub fn annotations_globally_permitted(&self) -> bool {
        self.settings.annotations_sharing
            || self.settings.highlights_sharing
            || self.settings.is_trusted()
    }

    /// Resolves the selected book text channel.
    ///
    /// With the flag off the channel is never extracted at all, which is
    /// distinct from "extracted but empty".
    #[must_use]
    pub fn book_text(&self, flags: &CapabilityFlags) -> ChannelDecision {
        self.text_channel(flags.use_book_text, Channel::BookText)
    }

    /// Resolves the full document channel; same double gate as book text.
    #[must_use]
    pub fn full_document(&self, flags: &CapabilityFlags) -> ChannelDecision {
        self.text_channel(flags.use_book_text, Channel::FullDocument)
    }

    fn text_channel(&self, flag: bool, channel: Channel) -> ChannelDecision {
        if !flag {
            return ChannelDecision::not_requested();
        }
        if self.book_text_globally_permitted() {
            ChannelDecision::allowed()
        } else {
            debug!(channel = %channel, "withheld: sharing disabled");
            ChannelDecision::withheld(UnavailableReason::SharingDisabled(channel))
        }
    }

    /// Resolves the annotations channel, with the two-tier degradation rule.
    ///
    /// Full annotation content needs the annotations setting (or trust).
    /// Failing that, highlight-level content is served instead when either
    /// sharing setting (or trust) permits it, with the degradation marker
    /// set. Failing both tiers the channel is withheld with a reason.
    #[must_use]
    pub fn annotations(&self, flags: &CapabilityFlags) -> ChannelDecision {
        if !flags.use_annotations {
            return ChannelDecision::not_requested();
        }
        if self.settings.annotations_sharing || self.settings.is_trusted() {
            return ChannelDecision::allowed();
        }
        if self.settings.highlights_sharing
            || self.settings.annotations_sharing
            || self.settings.is_trusted()
        {
            debug!("annotations degraded to highlight text");
            return ChannelDecision::degraded(UnavailableReason::UsingHighlightsOnly);
        }
        debug!("annotations withheld: sharing disabled");
        ChannelDecision::withheld(UnavailableReason::SharingDisabled(Channel::Annotations))
    }

    /// Resolves the notebook channel; opt-in, withheld by default.
    #[must_use]
    pub fn notebook(&self, flags: &CapabilityFlags) -> ChannelDecision {
        if !flags.use_notebook {
            return ChannelDecision::not_requested();
        }
        if self.settings.notebook_sharing || self.settings.is_trusted() {
            ChannelDecision::allowed()
        } else {
            debug!("notebook withheld: sharing disabled");
            ChannelDecision::withheld(UnavailableReason::SharingDisabled(Channel::Notebook))
        }
    }

    /// Resolves the reading progress channel.
    ///
    /// Opt-out and single-gated: available whenever a document is open and
    /// the setting was not explicitly switched off. No action flag applies.
    #[must_use]
    pub fn progress(&self, document_open: bool) -> ChannelDecision {
        if document_open && self.settings.progress_allowed() {
            ChannelDecision::allowed()
        } else {
            ChannelDecision::not_requested()
        }
    }

    /// Resolves the reading statistics channel; same shape as progress.
    #[must_use]
    pub fn stats(&self, document_open: bool) -> ChannelDecision {
        if document_open && self.settings.stats_allowed() {
            ChannelDecision::allowed()
        } else {
            ChannelDecision::not_requested()
        }
    }

    /// Resolves re-use of a named cache.
    ///
    /// The gate is the action's cache flag plus the record's own provenance:
    /// every channel that went into building the cache must still be
    /// permitted today. Records predating the provenance fields default to
    /// the strictest interpretation.
    #[must_use]
    pub fn cache(
        &self,
        kind: CacheKind,
        flags: &CapabilityFlags,
        record: Option<&CacheRecord>,
    ) -> ChannelDecision {
        if !flags.cache(kind) {
            return ChannelDecision::not_requested();
        }
        let Some(record) = record else {
            return ChannelDecision::withheld(UnavailableReason::CacheMissing(kind));
        };
        if self.record_permitted(record) {
            ChannelDecision::allowed()
        } else {
            debug!(cache = %kind, "cache locked by its provenance");
            ChannelDecision::withheld(UnavailableReason::CacheLocked(kind))
        }
    }

    /// Resolves re-use of the action's own prior result record.
    ///
    /// Same self-provenance rule as the named caches; templating the token
    /// is the request, so no separate action flag applies.
    #[must_use]
    pub fn prior_result(&self, record: &CacheRecord) -> bool {
        self.record_permitted(record)
    }

    fn record_permitted(&self, record: &CacheRecord) -> bool {
        (!record.needs_book_text() || self.book_text_globally_permitted())
            && (!record.needs_annotations() || self.annotations_globally_permitted())
    }
}
