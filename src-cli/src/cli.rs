//! Command-line surface of the `eds` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Client for the Electrolyte Design multi-agent backend
#[derive(Debug, Parser)]
#[command(
    name = "eds",
    version = env!("CARGO_PKG_VERSION"),
    long_version = env!("EDS_LONG_VERSION"),
    about = "Upload reference documents, index them and run electrolyte design queries",
    after_help = "Examples:\n  eds upload paper.pdf notes.txt\n  eds index\n  eds query \"high-voltage electrolyte for NMC811\" --materials \"LiPF6, FEC\"\n  eds status --json"
)]
pub struct Cli {
    /// Path to an eds.toml file (defaults to ./eds.toml when present)
    #[arg(short, long, global = true, env = "EDS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configured one
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit a design query and print the aggregated result
    Query {
        /// Natural-language design request
        text: String,

        /// Materials the user already has, as free text
        #[arg(short, long)]
        materials: Option<String>,

        /// List every retrieved reference instead of the preview
        #[arg(long)]
        show_all: bool,
    },

    /// Upload documents into the pending queue, one at a time in the given order
    Upload {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Index every pending document in one batch
    Index,

    /// Show pending and indexed documents
    Status,

    /// Remove a document from the pending queue
    Remove {
        filename: String,
    },

    /// Drop every pending and indexed document on the backend
    Clear {
        /// Confirm the deletion; nothing is sent without it
        #[arg(long)]
        yes: bool,
    },

    /// Search indexed passages without running the agents
    Search {
        text: String,
    },

    /// Print the global indexed-document count
    Count,

    /// Check that the backend is reachable
    Health,
}
