//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Confirmation-note extraction pipeline.
#[derive(Debug, Parser)]
#[command(name = "confnote", version, about)]
pub struct Cli {
    /// Path to the configuration file (defaults to ~/.confnote/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: retrieval, then extraction
    Run,

    /// Retrieval phase only: search mail and populate the ledger
    Retrieve,

    /// Extraction phase only: process ledger entries
    Extract(ExtractArgs),

    /// Show the ledger contents and counts
    Status(StatusArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Also reprocess entries that previously failed
    #[arg(long, conflicts_with = "reprocess_all")]
    pub retry_failed: bool,

    /// Reprocess every entry, successful ones included
    #[arg(long)]
    pub reprocess_all: bool,
}

/// Arguments for the status command.
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
