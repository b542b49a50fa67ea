//! Context acquisition.
//!
//! The host reading application exposes raw data through the
//! [`DocumentSource`] trait; the [`SectionAssembler`] queries it for
//! permitted channels only and builds the per-request data bag.

mod assembler;
mod source;

pub use assembler::{AssembleOptions, SectionAssembler};
pub use source::{DocumentSource, ReadingState, ReadingStats, SnapshotSource};
