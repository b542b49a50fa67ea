//! Integration tests for knowledge merging and indexing.
//!
//! Drives the merge → index → next-pass loop the way a cumulative analysis
//! action uses it, including JSON payloads shaped like model output.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use lectern::models::{EntityEntry, EventEntry, KnowledgeDocument, StateSummary};
use lectern::{EntityIndexBuilder, EntityMergeEngine};

fn stored() -> KnowledgeDocument {
    serde_json::from_str(
        r#"{
            "kind": "fiction",
            "characters": [
                {"name": "Elizabeth Bennet", "aliases": ["Lizzy", "Eliza", "Miss Bennet"],
                 "description": "second Bennet daughter"},
                {"name": "Mr. Darcy", "description": "wealthy and aloof"}
            ],
            "locations": [{"name": "Longbourn", "description": "the Bennet estate"}],
            "timeline": [{"summary": "Assembly at Meryton"}],
            "current_state": {"summary": "Jane is ill at Netherfield", "position": "ch. 7"}
        }"#,
    )
    .unwrap()
}

#[test]
fn test_spec_example_same_name_different_case() {
    let new = KnowledgeDocument {
        figures: Some(vec![EntityEntry::new("elizabeth bennet", "X")]),
        ..KnowledgeDocument::new()
    };
    let merged = EntityMergeEngine::new().merge(Some(stored()), Some(new));
    let figures = merged.figures.unwrap();

    let elizabeths = figures
        .iter()
        .filter(|e| e.name.eq_ignore_ascii_case("elizabeth bennet"))
        .count();
    assert_eq!(elizabeths, 1);
    assert_eq!(figures[0].description, "X");
}

#[test]
fn test_timeline_lengths_always_add() {
    let new = KnowledgeDocument {
        events: Some(vec![
            EventEntry::new("Assembly at Meryton"),
            EventEntry::new("Mr. Collins proposes"),
        ]),
        ..KnowledgeDocument::new()
    };
    let merged = EntityMergeEngine::new().merge(Some(stored()), Some(new));
    assert_eq!(merged.events.unwrap().len(), 3);
}

#[test]
fn test_merge_result_feeds_compact_index() {
    let new = KnowledgeDocument {
        figures: Some(vec![EntityEntry::new("Mr. Wickham", "charming officer")]),
        state: Some(StateSummary {
            summary: "Wickham spreads his story".to_string(),
            position: None,
        }),
        ..KnowledgeDocument::new()
    };
    let merged = EntityMergeEngine::new().merge(Some(stored()), Some(new));
    let index = EntityIndexBuilder::new().build_index(&merged);

    assert_eq!(
        index,
        "Characters: Elizabeth Bennet (Lizzy, Eliza), Mr. Darcy, Mr. Wickham\n\
         Locations: Longbourn\n\
         Timeline: Assembly at Meryton"
    );
    // The singleton never leaks into the index.
    assert!(!index.contains("Wickham spreads"));
}

#[test]
fn test_unrecognized_payload_merges_as_noop() {
    let malformed: KnowledgeDocument =
        serde_json::from_str(r#"{"something_else": [1, 2, 3]}"#).unwrap();
    let merged = EntityMergeEngine::new().merge(Some(stored()), Some(malformed));
    assert_eq!(merged, stored());
}

#[test]
fn test_nonfiction_payload_round_trip() {
    let old: KnowledgeDocument = serde_json::from_str(
        r#"{
            "kind": "nonfiction",
            "key_figures": [{"name": "Keynes"}],
            "argument_development": [{"summary": "Critique of classical theory"}],
            "current_position": {"summary": "Chapter 3: the multiplier"}
        }"#,
    )
    .unwrap();
    let new: KnowledgeDocument = serde_json::from_str(
        r#"{
            "core_concepts": [{"name": "Aggregate demand"}],
            "argument_development": [{"summary": "Introduction of the multiplier"}]
        }"#,
    )
    .unwrap();

    let merged = EntityMergeEngine::new().merge(Some(old), Some(new));
    assert_eq!(merged.events.as_ref().unwrap().len(), 2);

    let index = EntityIndexBuilder::new().build_index(&merged);
    assert!(index.starts_with("Key figures: Keynes"));
    assert!(index.contains("Core concepts: Aggregate demand"));
    assert!(index.contains("Argument development: Critique of classical theory, Introduction of the multiplier"));
}

#[test]
fn test_merged_document_survives_serialization() {
    let merged = EntityMergeEngine::new().merge(Some(stored()), None);
    let json = serde_json::to_string(&merged).unwrap();
    let back: KnowledgeDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(back, merged);
}
