//! # Lectern
//!
//! Privacy-gated prompt assembly and cumulative reading knowledge for
//! AI assistants embedded in reading applications.
//!
//! Lectern decides which categories of personal reading data (book text,
//! annotations, reading stats, private notes) may flow into a request,
//! renders an action's template into final prompt text, and accumulates
//! structured knowledge about a document across repeated analysis passes.
//!
//! ## Pipeline
//!
//! 1. An [`ActionSpec`] declares its required capabilities, explicitly or by
//!    scanning its template ([`CapabilityFlags::infer`]).
//! 2. The [`PermissionResolver`] evaluates each required channel against the
//!    reader's [`PrivacySettings`] and the trusted-provider allowlist.
//! 3. The [`SectionAssembler`] queries the host application for permitted
//!    channels only and builds a [`ContextDataBag`].
//! 4. The [`PlaceholderRenderer`] turns the template and the bag into the
//!    final prompt string.
//! 5. After the (out-of-scope) network round trip, the [`EntityMergeEngine`]
//!    folds newly extracted knowledge into the stored [`KnowledgeDocument`],
//!    and [`EntityIndexBuilder`] summarizes it for the next pass.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lectern::{PlaceholderRenderer, SectionAssembler, AssembleOptions};
//!
//! let assembler = SectionAssembler::new(&settings);
//! let bag = assembler.assemble(&action, &source, &AssembleOptions::default());
//! let prompt = PlaceholderRenderer::new().render(&action, &bag);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod context;
pub mod gating;
pub mod knowledge;
pub mod models;
pub mod rendering;

// Re-exports for convenience
pub use config::LecternConfig;
pub use context::{AssembleOptions, DocumentSource, SectionAssembler, SnapshotSource};
pub use gating::{CapabilityFlags, ChannelDecision, PermissionResolver};
pub use knowledge::{EntityIndexBuilder, EntityMergeEngine};
pub use models::{
    ActionSpec, CacheKind, CacheRecord, Channel, ContextDataBag, ContextType, DocumentKind,
    EntityEntry, EventEntry, KnowledgeDocument, PrivacySettings, UnavailableReason,
};
pub use rendering::PlaceholderRenderer;

/// Error type for lectern operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// The pure pipeline (gating, assembly, rendering, merging) never fails:
/// missing or withheld data renders as an empty section and a malformed
/// knowledge payload merges as a no-op. Errors exist only at the edges where
/// files are read and parsed (configuration, action specs, snapshots).
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - An action spec carries neither a template nor a template reference
    /// - JSON deserialization of an action, snapshot, or knowledge file fails
    /// - An unknown context type or cache name is given on the CLI
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - A configuration or fixture file cannot be read
    /// - TOML parsing of the configuration fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for lectern operations.
pub type Result<T> = std::result::Result<T, Error>;
