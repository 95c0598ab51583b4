//! CLI argument parsing.
//!
//! `vxsearch [OPTIONS] <STORE> <QUERY> [K]`. Malformed invocations are
//! rejected by clap, which prints usage to stderr and exits with status 2.

use clap::Parser;
use std::path::PathBuf;

// ============================================================================
// CLI argument types
// ============================================================================

/// Semantic top-K retrieval over a store of chunk embeddings.
#[derive(Parser, Debug)]
#[command(name = "vxsearch", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "VXSEARCH_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Tag printed before each chunk id (overrides `output.prefix`).
    #[arg(long)]
    pub prefix: Option<String>,

    /// Path to the vector store (JSON Lines, one chunk per line).
    pub store: PathBuf,

    /// Natural-language query.
    pub query: String,

    /// Number of results to return (default: `output.default_top_k`).
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub top_k: Option<u64>,
}

// ============================================================================
// Tests
// ============================================================================
