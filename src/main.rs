//! Binary entry point for lectern.
//!
//! This binary drives the prompt-assembly pipeline and the knowledge tools
//! from files, for host integration and debugging.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use lectern::cli::{cmd_flags, cmd_index, cmd_merge, cmd_render};

/// Lectern - privacy-gated prompt assembly for in-reader AI assistants.
#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Assemble and render a prompt.
    Render {
        /// Path to the action spec (JSON).
        action: PathBuf,

        /// Path to the extraction snapshot (JSON).
        snapshot: PathBuf,

        /// Path to the configuration file (TOML); defaults to the platform
        /// config location.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print withheld-channel reasons to stderr.
        #[arg(long)]
        show_withheld: bool,
    },

    /// Merge newly extracted knowledge into a stored document.
    Merge {
        /// Path to the newly extracted knowledge (JSON).
        new: PathBuf,

        /// Path to the stored knowledge document (JSON).
        #[arg(short, long)]
        old: Option<PathBuf>,
    },

    /// Print the compact entity index of a knowledge document.
    Index {
        /// Path to the knowledge document (JSON).
        doc: PathBuf,
    },

    /// Print the capability flags inferred from a template file.
    Flags {
        /// Path to the template file.
        template: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render {
            action,
            snapshot,
            config,
            show_withheld,
        } => cmd_render(&action, &snapshot, config.as_deref(), show_withheld),
        Commands::Merge { new, old } => cmd_merge(old.as_deref(), &new),
        Commands::Index { doc } => cmd_index(&doc),
        Commands::Flags { template } => cmd_flags(&template),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        },
    }
}
