//! Builds the per-request data bag.
//!
//! The assembler sits between the permission resolver and the renderer: it
//! evaluates every channel the action needs, queries the host application
//! for channels that are both permitted and actually referenced by the
//! template, applies the annotations degradation fallback, and records the
//! ordered withhold-reason list.

use std::collections::HashSet;
use tracing::debug;

use crate::gating::PermissionResolver;
use crate::models::{
    ActionSpec, CacheKind, CacheRecord, Channel, ContextDataBag, ContextType, Field,
    PrivacySettings, Requirement, UnavailableReason,
};
use crate::rendering::vocabulary::referenced_fields;

use super::source::DocumentSource;

/// Request-scoped inputs that do not come from the host application.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Target language for the response.
    pub response_language: Option<String>,
    /// Language for dictionary-style definitions.
    pub dictionary_language: Option<String>,
    /// The action's own prior-result record, for cumulative actions.
    pub prior: Option<CacheRecord>,
}

/// Assembles a [`ContextDataBag`] for one request.
#[derive(Debug, Clone, Copy)]
pub struct SectionAssembler<'a> {
    settings: &'a PrivacySettings,
}

impl<'a> SectionAssembler<'a> {
    /// Creates an assembler over the reader's privacy settings.
    #[must_use]
    pub const fn new(settings: &'a PrivacySettings) -> Self {
        Self { settings }
    }

    /// Builds the data bag for an action.
    ///
    /// Never fails: a withheld or empty channel becomes an empty field and,
    /// where worth telling the reader, a reason in the `unavailable` list.
    /// Channels are only queried once permitted, and only when the template
    /// references them (an action with an external template reference is
    /// assumed to reference everything its flags cover).
    #[must_use]
    pub fn assemble(
        &self,
        action: &ActionSpec,
        source: &dyn DocumentSource,
        opts: &AssembleOptions,
    ) -> ContextDataBag {
        let flags = action.capabilities();
        let resolver = PermissionResolver::new(self.settings);
        let referenced: Option<HashSet<Field>> = action.template_text().map(referenced_fields);
        let wants = |field: Field| referenced.as_ref().is_none_or(|set| set.contains(&field));

        let mut bag = ContextDataBag::new();
        bag.title = source.title();
        bag.author = source.author();
        let open = source.is_open();

        // Book text family: selection, full document, surrounding text, and
        // incremental text all share the book text gate.
        let text = resolver.book_text(&flags);
        if text.allowed {
            if wants(Field::BookText) {
                bag.book_text = source.book_text();
            }
            if wants(Field::SurroundingText) {
                bag.surrounding_text = source.surrounding_text();
            }
            if wants(Field::IncrementalText) {
                bag.incremental_text = source.incremental_text();
            }
        } else if let Some(reason) = text.reason {
            if wants(Field::BookText) || wants(Field::SurroundingText) {
                bag.unavailable.push(reason);
            }
        }

        let full = resolver.full_document(&flags);
        if full.allowed {
            if wants(Field::FullDocument) {
                bag.full_document = source.full_document();
            }
        } else if let Some(reason) = full.reason {
            if wants(Field::FullDocument) {
                bag.unavailable.push(reason);
            }
        }

        // Annotations, with the highlight fallback tier.
        if wants(Field::Annotations) {
            let ann = resolver.annotations(&flags);
            if ann.allowed {
                bag.annotations = if ann.degraded {
                    source.highlights()
                } else {
                    source.annotations()
                };
                bag.degraded.annotations = ann.degraded;
                if ann.degraded {
                    bag.unavailable.push(UnavailableReason::UsingHighlightsOnly);
                    if bag.annotations.is_empty() {
                        bag.unavailable
                            .push(UnavailableReason::NoneFound(Channel::Highlights));
                    }
                } else if bag.annotations.is_empty() {
                    bag.unavailable
                        .push(UnavailableReason::NoneFound(Channel::Annotations));
                }
            } else if let Some(reason) = ann.reason {
                bag.unavailable.push(reason);
            }
        }

        // Notebook.
        if wants(Field::Notebook) {
            let nb = resolver.notebook(&flags);
            if nb.allowed {
                bag.notebook = source.notebook();
                if bag.notebook.is_empty() {
                    bag.unavailable
                        .push(UnavailableReason::NoneFound(Channel::Notebook));
                }
            } else if let Some(reason) = nb.reason {
                bag.unavailable.push(reason);
            }
        }

        // Disambiguation context rides along with the selection itself; it
        // is reader-supplied, not a privacy channel.
        if wants(Field::Disambiguation) {
            bag.disambiguation = source.disambiguation();
        }

        // Reading state and stats: opt-out, no action-level gate.
        let wants_progress = wants(Field::ProgressPercent)
            || wants(Field::ProgressDecimal)
            || wants(Field::ChapterTitle)
            || wants(Field::ChaptersRead);
        if wants_progress && resolver.progress(open).allowed {
            if let Some(state) = source.reading_state() {
                bag.progress_percent = format!("{:.0}%", state.percent);
                bag.progress_decimal = format!("{:.2}", state.percent / 100.0);
                bag.chapter_title = state.chapter_title;
                bag.chapters_read = state.chapters_read.to_string();
            }
        }
        if wants(Field::TimeSinceLastRead) && resolver.stats(open).allowed {
            if let Some(stats) = source.stats() {
                bag.time_since_last_read = stats.time_since_last_read;
            }
        }

        // Named caches, each gated by its own flag and its own provenance.
        for &kind in CacheKind::all() {
            let field = cache_field(kind);
            if !flags.cache(kind) || !wants(field) {
                continue;
            }
            let record = source.cache(kind);
            let decision = resolver.cache(kind, &flags, record.as_ref());
            if decision.allowed {
                if let Some(record) = record {
                    *cache_slot(&mut bag, kind) = record.content;
                }
            } else if let Some(reason) = decision.reason {
                bag.unavailable.push(reason);
            }
        }

        // The action's own prior result, under the self-provenance rule.
        if let Some(prior) = &opts.prior {
            if (wants(Field::PreviousResult) || wants(Field::PreviousProgress))
                && resolver.prior_result(prior)
            {
                bag.previous_result = prior.content.clone();
                bag.previous_progress = prior.progress.clone().unwrap_or_default();
            }
        }

        // Multi-document framing data is structural, not a privacy channel.
        if action.context == ContextType::MultiDocument {
            let items = source.items();
            bag.item_count = items.len().to_string();
            bag.item_list = items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n");
        }

        bag.response_language = opts.response_language.clone().unwrap_or_default();
        bag.dictionary_language = opts.dictionary_language.clone().unwrap_or_default();

        debug!(
            action = %action.id,
            withheld = bag.unavailable.len(),
            degraded = bag.degraded.annotations,
            "context assembled"
        );
        bag
    }

    /// Checks the action's coarse requirements against an assembled bag.
    ///
    /// Returns the requirements the bag failed to satisfy, in declaration
    /// order; the caller decides whether to proceed with a thinner prompt.
    #[must_use]
    pub fn missing_requirements(action: &ActionSpec, bag: &ContextDataBag) -> Vec<Requirement> {
        action
            .requires
            .iter()
            .copied()
            .filter(|req| !requirement_met(*req, bag))
            .collect()
    }
}

const fn cache_field(kind: CacheKind) -> Field {
    match kind {
        CacheKind::Xray => Field::XrayCache,
        CacheKind::Analyze => Field::AnalyzeCache,
        CacheKind::Summary => Field::SummaryCache,
    }
}

fn cache_slot(bag: &mut ContextDataBag, kind: CacheKind) -> &mut String {
    match kind {
        CacheKind::Xray => &mut bag.xray_cache,
        CacheKind::Analyze => &mut bag.analyze_cache,
        CacheKind::Summary => &mut bag.summary_cache,
    }
}

fn requirement_met(req: Requirement, bag: &ContextDataBag) -> bool {
    match req {
        Requirement::BookText => !bag.book_text.is_empty() || !bag.full_document.is_empty(),
        Requirement::Annotations => !bag.annotations.is_empty(),
        Requirement::Notebook => !bag.notebook.is_empty(),
        Requirement::Author => !bag.author.is_empty(),
        Requirement::ReadingState => !bag.progress_percent.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::source::SnapshotSource;

    fn snapshot() -> SnapshotSource {
        SnapshotSource {
            title: "Pride and Prejudice".to_string(),
            author: "Jane Austen".to_string(),
            book_text: "It is a truth universally acknowledged".to_string(),
            annotations: "Ch1: irony in the opening line".to_string(),
            highlights: "It is a truth universally acknowledged".to_string(),
            notebook: "Reread the Meryton assembly".to_string(),
            ..SnapshotSource::default()
        }
    }

    #[test]
    fn test_unreferenced_channels_are_not_queried() {
        struct Tripwire;
        impl DocumentSource for Tripwire {
            fn title(&self) -> String {
                "t".to_string()
            }
            fn notebook(&self) -> String {
                // The template never mentions the notebook, so assembly must
                // not reach this.
                panic!("notebook queried without being referenced")
            }
        }

        let settings = PrivacySettings::new().with_notebook();
        let action = ActionSpec::with_template("a", "{{title}}");
        let bag = SectionAssembler::new(&settings).assemble(
            &action,
            &Tripwire,
            &AssembleOptions::default(),
        );
        assert!(bag.notebook.is_empty());
    }

    #[test]
    fn test_withheld_channel_is_not_queried_and_reason_recorded() {
        struct Tripwire;
        impl DocumentSource for Tripwire {
            fn title(&self) -> String {
                "t".to_string()
            }
            fn book_text(&self) -> String {
                panic!("book text queried while withheld")
            }
        }

        let settings = PrivacySettings::new();
        let action = ActionSpec::with_template("a", "Explain {{book_text_section}}");
        let bag = SectionAssembler::new(&settings).assemble(
            &action,
            &Tripwire,
            &AssembleOptions::default(),
        );
        assert!(bag.book_text.is_empty());
        assert_eq!(
            bag.unavailable,
            vec![UnavailableReason::SharingDisabled(Channel::BookText)]
        );
    }

    #[test]
    fn test_degraded_annotations_use_highlights() {
        let settings = PrivacySettings::new().with_highlights();
        let action = ActionSpec::with_template("a", "{{annotations_section}}");
        let bag = SectionAssembler::new(&settings).assemble(
            &action,
            &snapshot(),
            &AssembleOptions::default(),
        );
        assert!(bag.degraded.annotations);
        assert_eq!(bag.annotations, "It is a truth universally acknowledged");
        assert!(bag
            .unavailable
            .contains(&UnavailableReason::UsingHighlightsOnly));
    }

    #[test]
    fn test_full_annotations_when_shared() {
        let settings = PrivacySettings::new().with_annotations();
        let action = ActionSpec::with_template("a", "{{annotations_section}}");
        let bag = SectionAssembler::new(&settings).assemble(
            &action,
            &snapshot(),
            &AssembleOptions::default(),
        );
        assert!(!bag.degraded.annotations);
        assert_eq!(bag.annotations, "Ch1: irony in the opening line");
        assert!(bag.unavailable.is_empty());
    }

    #[test]
    fn test_multi_document_items() {
        let settings = PrivacySettings::new();
        let source = SnapshotSource {
            title: "shelf".to_string(),
            items: vec!["Emma".to_string(), "Persuasion".to_string()],
            ..SnapshotSource::default()
        };
        let action = ActionSpec::with_template("compare", "Compare {{item_list}}")
            .in_context(ContextType::MultiDocument);
        let bag = SectionAssembler::new(&settings).assemble(
            &action,
            &source,
            &AssembleOptions::default(),
        );
        assert_eq!(bag.item_count, "2");
        assert_eq!(bag.item_list, "- Emma\n- Persuasion");
    }

    #[test]
    fn test_prior_result_respects_provenance() {
        let settings = PrivacySettings::new();
        let prior = CacheRecord::new("previous summary").with_provenance(true, false);
        let action = ActionSpec::with_template("a", "{{previous_result}}");
        let opts = AssembleOptions {
            prior: Some(prior.clone()),
            ..AssembleOptions::default()
        };

        let bag = SectionAssembler::new(&settings).assemble(&action, &snapshot(), &opts);
        assert!(bag.previous_result.is_empty());

        let settings = PrivacySettings::new().with_book_text();
        let bag = SectionAssembler::new(&settings).assemble(&action, &snapshot(), &opts);
        assert_eq!(bag.previous_result, "previous summary");
    }

    #[test]
    fn test_missing_requirements() {
        let settings = PrivacySettings::new();
        let mut action = ActionSpec::with_template("a", "{{book_text_section}}");
        action.requires = vec![Requirement::BookText, Requirement::Author];
        let bag = SectionAssembler::new(&settings).assemble(
            &action,
            &snapshot(),
            &AssembleOptions::default(),
        );
        // Book text is withheld (sharing off), author is present.
        assert_eq!(
            SectionAssembler::missing_requirements(&action, &bag),
            vec![Requirement::BookText]
        );
    }
}
