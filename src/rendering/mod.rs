//! Prompt rendering.
//!
//! Turns an action's template plus a gated [`crate::models::ContextDataBag`]
//! into the final request text.

mod prompt_renderer;
pub mod vocabulary;

pub use prompt_renderer::PlaceholderRenderer;
