//! Benchmarks for prompt rendering and knowledge merging.

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use lectern::models::{EntityEntry, EventEntry, KnowledgeDocument};
use lectern::{
    ActionSpec, AssembleOptions, ContextType, EntityMergeEngine, PlaceholderRenderer,
    PrivacySettings, SectionAssembler, SnapshotSource,
};

fn bench_render(c: &mut Criterion) {
    let settings = PrivacySettings::new().with_book_text().with_annotations();
    let source = SnapshotSource {
        title: "Pride and Prejudice".to_string(),
        author: "Jane Austen".to_string(),
        book_text: "It is a truth universally acknowledged ".repeat(64),
        annotations: "Opening irony noted.\n".repeat(32),
        ..SnapshotSource::default()
    };
    let action = ActionSpec::with_template(
        "explain",
        "Explain this passage from {{title}}{{author_clause}}.\n\
         {{book_text_section}}\n{{annotations_section}}\n{{conciseness_nudge}}",
    )
    .in_context(ContextType::Highlight);

    let assembler = SectionAssembler::new(&settings);
    let renderer = PlaceholderRenderer::new();

    c.bench_function("assemble_and_render", |b| {
        b.iter(|| {
            let bag = assembler.assemble(
                black_box(&action),
                black_box(&source),
                &AssembleOptions::default(),
            );
            renderer.render(black_box(&action), &bag)
        });
    });
}

fn bench_merge(c: &mut Criterion) {
    let old = KnowledgeDocument {
        figures: Some(
            (0..100)
                .map(|i| EntityEntry::new(format!("Character {i}"), "recurring"))
                .collect(),
        ),
        events: Some((0..200).map(|i| EventEntry::new(format!("Event {i}"))).collect()),
        ..KnowledgeDocument::new()
    };
    let new = KnowledgeDocument {
        figures: Some(
            (50..150)
                .map(|i| EntityEntry::new(format!("character {i}"), "updated"))
                .collect(),
        ),
        events: Some((0..20).map(|i| EventEntry::new(format!("New event {i}"))).collect()),
        ..KnowledgeDocument::new()
    };
    let engine = EntityMergeEngine::new();

    c.bench_function("merge_knowledge", |b| {
        b.iter(|| engine.merge(black_box(Some(old.clone())), black_box(Some(new.clone()))));
    });
}

criterion_group!(benches, bench_render, bench_merge);
criterion_main!(benches);
