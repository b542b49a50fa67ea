//! Compact entity index for re-injection.
//!
//! The index is fed back into the next extraction pass so the model extends
//! existing entities instead of recreating them under new names. It stays
//! compact: names and at most two aliases, never descriptions.

use std::fmt::Write;

use crate::models::{EntityEntry, KnowledgeDocument, ListCategory};

/// Summarizes a knowledge document into a compact listing.
#[derive(Debug, Clone, Default)]
pub struct EntityIndexBuilder {
    _private: (),
}

impl EntityIndexBuilder {
    /// Creates a new index builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index: one line per non-singleton category present.
    ///
    /// Each entry is its canonical name, followed by up to its first two
    /// aliases in parentheses; alias-free entries are listed bare. Singleton
    /// categories never appear. A document with no non-singleton categories
    /// yields the empty string.
    #[must_use]
    pub fn build_index(&self, doc: &KnowledgeDocument) -> String {
        let mut lines: Vec<String> = Vec::new();

        for &category in ListCategory::all() {
            if let Some(entries) = doc.list(category) {
                if entries.is_empty() {
                    continue;
                }
                let listing = entries.iter().map(format_entry).collect::<Vec<_>>();
                lines.push(format!(
                    "{}: {}",
                    category.label(doc.kind),
                    listing.join(", ")
                ));
            }
        }

        if let Some(events) = doc.events.as_deref() {
            if !events.is_empty() {
                let listing = events
                    .iter()
                    .map(|e| e.summary.clone())
                    .collect::<Vec<_>>();
                lines.push(format!("{}: {}", doc.events_label(), listing.join(", ")));
            }
        }

        lines.join("\n")
    }
}

/// Formats one entry as `Name` or `Name (alias1, alias2)`.
fn format_entry(entry: &EntityEntry) -> String {
    if entry.aliases.is_empty() {
        return entry.name.clone();
    }
    let mut out = entry.name.clone();
    let shown = entry
        .aliases
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(out, " ({shown})");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentKind, EventEntry, StateSummary};

    #[test]
    fn test_empty_document_yields_empty_string() {
        let builder = EntityIndexBuilder::new();
        assert_eq!(builder.build_index(&KnowledgeDocument::new()), "");
    }

    #[test]
    fn test_singleton_only_document_yields_empty_string() {
        let doc = KnowledgeDocument {
            state: Some(StateSummary {
                summary: "midway".to_string(),
                position: None,
            }),
            engagement: Some("engaged".to_string()),
            ..KnowledgeDocument::new()
        };
        assert_eq!(EntityIndexBuilder::new().build_index(&doc), "");
    }

    #[test]
    fn test_aliases_capped_at_two() {
        let doc = KnowledgeDocument {
            figures: Some(vec![
                EntityEntry::new("Elizabeth Bennet", "protagonist")
                    .with_alias("Lizzy")
                    .with_alias("Eliza")
                    .with_alias("Miss Bennet"),
                EntityEntry::new("Mr. Darcy", "proud"),
            ]),
            ..KnowledgeDocument::new()
        };
        assert_eq!(
            EntityIndexBuilder::new().build_index(&doc),
            "Characters: Elizabeth Bennet (Lizzy, Eliza), Mr. Darcy"
        );
    }

    #[test]
    fn test_labels_follow_document_kind() {
        let doc = KnowledgeDocument {
            kind: Some(DocumentKind::Nonfiction),
            figures: Some(vec![EntityEntry::new("Keynes", "economist")]),
            concepts: Some(vec![EntityEntry::new("Aggregate demand", "")]),
            events: Some(vec![EventEntry::new("Critique of classical theory")]),
            ..KnowledgeDocument::new()
        };
        assert_eq!(
            EntityIndexBuilder::new().build_index(&doc),
            "Key figures: Keynes\nCore concepts: Aggregate demand\nArgument development: Critique of classical theory"
        );
    }

    #[test]
    fn test_empty_category_list_is_skipped() {
        let doc = KnowledgeDocument {
            locations: Some(Vec::new()),
            lexicon: Some(vec![EntityEntry::new("entail", "inheritance restriction")]),
            ..KnowledgeDocument::new()
        };
        assert_eq!(
            EntityIndexBuilder::new().build_index(&doc),
            "Lexicon: entail"
        );
    }
}
