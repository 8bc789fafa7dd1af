use clap::{Args, Parser, Subcommand};
use search_core::request_queue::DEFAULT_WINDOW;
use search_core::{DocId, DocumentStatus};

use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "search-cli")]
#[command(about = "Query an in-memory TF-IDF document index", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Documents to index (JSON/JSONL file or directory)
    #[arg(long)]
    pub docs: PathBuf,
    /// Space-separated stop words; falls back to SEARCH_STOP_WORDS
    #[arg(long)]
    pub stop_words: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the top documents for each query
    Search {
        #[command(flatten)]
        index: IndexArgs,
        /// Only documents with this status
        #[arg(long, default_value_t = DocumentStatus::Actual)]
        status: DocumentStatus,
        /// Score on the rayon pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Results per printed page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
        /// Queries; read from stdin, one per line, when omitted
        #[arg(allow_hyphen_values = true)]
        queries: Vec<String>,
    },
    /// Show which query words each document contains
    Match {
        #[command(flatten)]
        index: IndexArgs,
        /// Documents to match; all documents when omitted
        #[arg(long = "id")]
        ids: Vec<DocId>,
        #[arg(long, default_value_t = false)]
        parallel: bool,
        #[arg(allow_hyphen_values = true)]
        query: String,
    },
    /// Run a batch of queries in parallel and print JSON results
    Batch {
        #[command(flatten)]
        index: IndexArgs,
        /// File with one query per line; stdin when omitted
        #[arg(long)]
        queries: Option<PathBuf>,
        /// Print one combined result list
        #[arg(long, default_value_t = false)]
        joined: bool,
    },
    /// Remove documents with identical word sets
    Dedup {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Count empty results among the most recent queries read from stdin
    Stats {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: u64,
    },
}
