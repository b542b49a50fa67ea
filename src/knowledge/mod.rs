//! Cumulative knowledge maintenance.
//!
//! Combines newly extracted knowledge with the stored document and
//! summarizes it compactly for re-injection into the next extraction pass.

mod index;
mod merge;

pub use index::EntityIndexBuilder;
pub use merge::EntityMergeEngine;
