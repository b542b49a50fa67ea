//! CLI command implementations.
//!
//! The CLI drives the library end to end from files, which keeps the host
//! integration honest: an action spec and a snapshot of extraction values go
//! in, the final prompt comes out.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `render` | Assemble and render a prompt from an action and a snapshot |
//! | `merge` | Merge newly extracted knowledge into a stored document |
//! | `index` | Print the compact entity index of a knowledge document |
//! | `flags` | Print the capability flags inferred from a template |

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::LecternConfig;
use crate::context::{AssembleOptions, SectionAssembler, SnapshotSource};
use crate::gating::CapabilityFlags;
use crate::knowledge::{EntityIndexBuilder, EntityMergeEngine};
use crate::models::{ActionSpec, KnowledgeDocument};
use crate::rendering::PlaceholderRenderer;

/// Reads and deserializes a JSON file.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {what} from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing {what} from {}", path.display()))
}

/// Renders a prompt from an action spec and a snapshot of extraction values.
///
/// The prompt goes to stdout; withheld-channel transparency and unmet
/// requirements go to stderr so pipelines stay clean.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed.
pub fn cmd_render(
    action_path: &Path,
    snapshot_path: &Path,
    config_path: Option<&Path>,
    show_withheld: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => LecternConfig::load_from_file(path)?,
        None => LecternConfig::load_default(),
    };
    let action: ActionSpec = read_json(action_path, "action spec")?;
    let snapshot: SnapshotSource = read_json(snapshot_path, "snapshot")?;

    let opts = AssembleOptions {
        response_language: config.response_language.clone(),
        dictionary_language: config.dictionary_language.clone(),
        prior: None,
    };
    let assembler = SectionAssembler::new(&config.privacy);
    let bag = assembler.assemble(&action, &snapshot, &opts);
    let missing = SectionAssembler::missing_requirements(&action, &bag);
    let prompt = PlaceholderRenderer::new().render(&action, &bag);

    println!("{prompt}");
    if show_withheld && !bag.unavailable.is_empty() {
        eprintln!("withheld: {}", bag.unavailable_summary());
    }
    if !missing.is_empty() {
        let names = missing
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!("unmet requirements: {names}");
    }
    Ok(())
}

/// Merges newly extracted knowledge into a stored document and prints the
/// combined document as JSON.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed.
pub fn cmd_merge(old_path: Option<&Path>, new_path: &Path) -> Result<()> {
    let old: Option<KnowledgeDocument> = old_path
        .map(|path| read_json(path, "stored knowledge document"))
        .transpose()?;
    let new: KnowledgeDocument = read_json(new_path, "extracted knowledge")?;

    let merged = EntityMergeEngine::new().merge(old, Some(new));
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

/// Prints the compact entity index of a knowledge document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn cmd_index(doc_path: &Path) -> Result<()> {
    let doc: KnowledgeDocument = read_json(doc_path, "knowledge document")?;
    let index = EntityIndexBuilder::new().build_index(&doc);
    if !index.is_empty() {
        println!("{index}");
    }
    Ok(())
}

/// Prints the capability flags inferred from a template.
///
/// # Errors
///
/// Returns an error if the template file cannot be read.
pub fn cmd_flags(template_path: &Path) -> Result<()> {
    let template = std::fs::read_to_string(template_path)
        .with_context(|| format!("reading template from {}", template_path.display()))?;
    let flags = CapabilityFlags::infer(&template);
    println!("{}", serde_json::to_string_pretty(&flags)?);
    Ok(())
}
