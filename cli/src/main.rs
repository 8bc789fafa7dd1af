use anyhow::Result;
use clap::Parser;
use search_cli::args::{Cli, Commands};
use search_cli::{
    build_server, policy, read_queries, resolve_stop_words, run_batch, run_dedup, run_match, run_search, run_stats,
};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Search { index, status, parallel, page_size, queries } => {
            let server = build_server(&index.docs, &resolve_stop_words(index.stop_words))?;
            let queries = if queries.is_empty() { read_queries(None)? } else { queries };
            run_search(&mut out, &server, &queries, status, policy(parallel), page_size)
        }
        Commands::Match { index, ids, parallel, query } => {
            let server = build_server(&index.docs, &resolve_stop_words(index.stop_words))?;
            run_match(&mut out, &server, &query, &ids, policy(parallel))
        }
        Commands::Batch { index, queries, joined } => {
            let server = build_server(&index.docs, &resolve_stop_words(index.stop_words))?;
            let queries = read_queries(queries.as_deref())?;
            run_batch(&mut out, &server, &queries, joined)
        }
        Commands::Dedup { index } => {
            let mut server = build_server(&index.docs, &resolve_stop_words(index.stop_words))?;
            run_dedup(&mut out, &mut server)
        }
        Commands::Stats { index, window } => {
            let server = build_server(&index.docs, &resolve_stop_words(index.stop_words))?;
            let queries = read_queries(None)?;
            run_stats(&mut out, &server, &queries, window)
        }
    }
}
