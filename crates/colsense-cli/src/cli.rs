//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Colsense: semantic type inference for warehouse columns
#[derive(Parser)]
#[command(name = "colsense")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer a semantic type for every column in a statistics snapshot
    Infer {
        /// Path to the snapshot (JSON, CSV or TSV)
        #[arg(value_name = "SNAPSHOT")]
        file: PathBuf,

        /// Ruleset configuration file (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output the full outcome as JSON
        #[arg(long)]
        json: bool,

        /// Evaluate rules in parallel
        #[arg(long)]
        parallel: bool,

        /// Only show columns that could not be resolved
        #[arg(long)]
        unresolved_only: bool,
    },

    /// List the rules that would run, in order
    Rules {
        /// Ruleset configuration file (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}
