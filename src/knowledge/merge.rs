//! Incremental knowledge merging.
//!
//! Merge rules are dispatched by a category's structural shape, not its
//! name: list categories match entries by case-insensitive name and replace
//! in place, the pure-append category concatenates verbatim, singletons are
//! replaced wholesale. The merge never fails; a malformed or empty update
//! leaves the stored document unchanged.

use tracing::debug;

use crate::models::{EntityEntry, KnowledgeDocument};

/// Combines a stored knowledge document with newly extracted knowledge.
#[derive(Debug, Clone, Default)]
pub struct EntityMergeEngine {
    _private: (), // Prevent external construction, allow future fields
}

impl EntityMergeEngine {
    /// Creates a new merge engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `new` into `old`, returning the combined document.
    ///
    /// The result is a full replacement for the stored document; callers
    /// persist it atomically and never patch the old one in place. Absent
    /// inputs pass through: `merge(old, None)` is `old`, `merge(None, new)`
    /// is `new`, and merging an empty update is a no-op.
    #[must_use]
    pub fn merge(
        &self,
        old: Option<KnowledgeDocument>,
        new: Option<KnowledgeDocument>,
    ) -> KnowledgeDocument {
        let Some(new) = new else {
            return old.unwrap_or_default();
        };
        let Some(old) = old else {
            return new;
        };

        let merged = KnowledgeDocument {
            // The genre discriminant sticks once known.
            kind: old.kind.or(new.kind),
            figures: merge_entity_lists(old.figures, new.figures),
            locations: merge_entity_lists(old.locations, new.locations),
            concepts: merge_entity_lists(old.concepts, new.concepts),
            lexicon: merge_entity_lists(old.lexicon, new.lexicon),
            // Pure append: no identity, no deduplication.
            events: match (old.events, new.events) {
                (Some(mut old_events), Some(new_events)) => {
                    old_events.extend(new_events);
                    Some(old_events)
                },
                (events, None) | (None, events) => events,
            },
            // Singletons are replaced wholesale.
            state: new.state.or(old.state),
            engagement: new.engagement.or(old.engagement),
        };

        debug!(
            figures = merged.figures.as_ref().map_or(0, Vec::len),
            events = merged.events.as_ref().map_or(0, Vec::len),
            "knowledge merged"
        );
        merged
    }
}

/// Merges one list category by case-insensitive canonical name.
///
/// Matching entries are replaced in place, preserving their original
/// position; unmatched entries append. When `new` itself carries two entries
/// with colliding names, the later one wins.
fn merge_entity_lists(
    old: Option<Vec<EntityEntry>>,
    new: Option<Vec<EntityEntry>>,
) -> Option<Vec<EntityEntry>> {
    match (old, new) {
        (old, None) => old,
        (None, new) => new,
        (Some(mut merged), Some(new_entries)) => {
            for entry in new_entries {
                let key = entry.name.to_lowercase();
                if let Some(existing) = merged.iter_mut().find(|e| e.name.to_lowercase() == key) {
                    *existing = entry;
                } else {
                    merged.push(entry);
                }
            }
            Some(merged)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentKind, EventEntry, StateSummary};

    fn old_doc() -> KnowledgeDocument {
        KnowledgeDocument {
            kind: Some(DocumentKind::Fiction),
            figures: Some(vec![
                EntityEntry::new("Elizabeth Bennet", "second Bennet daughter")
                    .with_alias("Lizzy"),
                EntityEntry::new("Mr. Darcy", "wealthy, proud"),
            ]),
            events: Some(vec![EventEntry::new("Assembly at Meryton")]),
            state: Some(StateSummary {
                summary: "Jane ill at Netherfield".to_string(),
                position: Some("ch. 7".to_string()),
            }),
            ..KnowledgeDocument::new()
        }
    }

    #[test]
    fn test_merge_identities() {
        let engine = EntityMergeEngine::new();
        assert_eq!(engine.merge(Some(old_doc()), None), old_doc());
        assert_eq!(engine.merge(None, Some(old_doc())), old_doc());
        assert_eq!(
            engine.merge(Some(old_doc()), Some(KnowledgeDocument::new())),
            old_doc()
        );
        assert_eq!(engine.merge(None, None), KnowledgeDocument::new());
    }

    #[test]
    fn test_case_insensitive_replace_preserves_position() {
        let new = KnowledgeDocument {
            figures: Some(vec![EntityEntry::new(
                "elizabeth bennet",
                "sharp-witted protagonist",
            )]),
            ..KnowledgeDocument::new()
        };
        let merged = EntityMergeEngine::new().merge(Some(old_doc()), Some(new));
        let figures = merged.figures.unwrap();
        assert_eq!(figures.len(), 2);
        // Replaced in place, at the original position.
        assert_eq!(figures[0].name, "elizabeth bennet");
        assert_eq!(figures[0].description, "sharp-witted protagonist");
        assert_eq!(figures[1].name, "Mr. Darcy");
    }

    #[test]
    fn test_unmatched_entries_append() {
        let new = KnowledgeDocument {
            figures: Some(vec![EntityEntry::new("Mr. Collins", "obsequious cousin")]),
            ..KnowledgeDocument::new()
        };
        let merged = EntityMergeEngine::new().merge(Some(old_doc()), Some(new));
        let figures = merged.figures.unwrap();
        assert_eq!(figures.len(), 3);
        assert_eq!(figures[2].name, "Mr. Collins");
    }

    #[test]
    fn test_last_write_wins_within_one_batch() {
        let new = KnowledgeDocument {
            figures: Some(vec![
                EntityEntry::new("Mr. Darcy", "first take"),
                EntityEntry::new("MR. DARCY", "second take"),
            ]),
            ..KnowledgeDocument::new()
        };
        let merged = EntityMergeEngine::new().merge(Some(old_doc()), Some(new));
        let figures = merged.figures.unwrap();
        assert_eq!(figures.len(), 2);
        assert_eq!(figures[1].description, "second take");
    }

    #[test]
    fn test_events_append_even_exact_duplicates() {
        let new = KnowledgeDocument {
            events: Some(vec![
                EventEntry::new("Assembly at Meryton"),
                EventEntry::new("Netherfield ball"),
            ]),
            ..KnowledgeDocument::new()
        };
        let merged = EntityMergeEngine::new().merge(Some(old_doc()), Some(new));
        let events = merged.events.unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].summary, "Assembly at Meryton");
        assert_eq!(events[1].summary, "Assembly at Meryton");
    }

    #[test]
    fn test_singletons_replaced_wholesale() {
        let new = KnowledgeDocument {
            state: Some(StateSummary {
                summary: "Elizabeth refuses Mr. Collins".to_string(),
                position: None,
            }),
            engagement: Some("reading nightly".to_string()),
            ..KnowledgeDocument::new()
        };
        let merged = EntityMergeEngine::new().merge(Some(old_doc()), Some(new));
        assert_eq!(merged.state.unwrap().summary, "Elizabeth refuses Mr. Collins");
        assert_eq!(merged.engagement.as_deref(), Some("reading nightly"));
    }

    #[test]
    fn test_kind_retained_from_old() {
        let new = KnowledgeDocument {
            kind: Some(DocumentKind::Nonfiction),
            ..KnowledgeDocument::new()
        };
        let merged = EntityMergeEngine::new().merge(Some(old_doc()), Some(new));
        assert_eq!(merged.kind, Some(DocumentKind::Fiction));
    }

    #[test]
    fn test_new_categories_adopted() {
        let new = KnowledgeDocument {
            locations: Some(vec![EntityEntry::new("Pemberley", "Darcy's estate")]),
            ..KnowledgeDocument::new()
        };
        let merged = EntityMergeEngine::new().merge(Some(old_doc()), Some(new));
        assert_eq!(merged.locations.unwrap()[0].name, "Pemberley");
        // Categories only in old pass through unchanged.
        assert_eq!(merged.figures.unwrap().len(), 2);
    }
}
