pub mod args;

use anyhow::{bail, Context, Result};
use search_core::request_queue::RequestQueue;
use search_core::{
    paginate, process_queries, process_queries_joined, remove_duplicates, DocId, Document, DocumentStatus,
    ExecutionPolicy, SearchServer,
};
use serde::Deserialize;
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub const STOP_WORDS_ENV: &str = "SEARCH_STOP_WORDS";

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

/// Stop words from the command line, else from `SEARCH_STOP_WORDS`, else none.
pub fn resolve_stop_words(arg: Option<String>) -> String {
    pick_stop_words(arg, std::env::var(STOP_WORDS_ENV).ok())
}

fn pick_stop_words(arg: Option<String>, env: Option<String>) -> String {
    arg.or(env).unwrap_or_default()
}

fn collect_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

/// Read documents from a `.json` file (one object or an array), a `.jsonl`
/// file (one object per line), or a directory of such files.
pub fn load_documents(input: &Path) -> Result<Vec<InputDoc>> {
    let mut docs = Vec::new();
    for file in collect_files(input) {
        let reader = BufReader::new(File::open(&file).with_context(|| format!("opening {}", file.display()))?);
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            for (n, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let doc: InputDoc = serde_json::from_str(&line)
                    .with_context(|| format!("{}:{}: malformed document", file.display(), n + 1))?;
                docs.push(doc);
            }
        } else {
            let json: serde_json::Value =
                serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
            match json {
                serde_json::Value::Array(arr) => {
                    for (i, v) in arr.into_iter().enumerate() {
                        let doc: InputDoc = serde_json::from_value(v)
                            .with_context(|| format!("{}[{i}]: malformed document", file.display()))?;
                        docs.push(doc);
                    }
                }
                serde_json::Value::Object(_) => {
                    let doc: InputDoc = serde_json::from_value(json)
                        .with_context(|| format!("{}: malformed document", file.display()))?;
                    docs.push(doc);
                }
                _ => bail!("{}: expected a document object or array", file.display()),
            }
        }
    }
    Ok(docs)
}

pub fn build_server(docs_path: &Path, stop_words: &str) -> Result<SearchServer> {
    let mut server = SearchServer::from_stop_words_text(stop_words).context("invalid stop words")?;
    for doc in load_documents(docs_path)? {
        server
            .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("adding document {}", doc.id))?;
    }
    tracing::info!(num_docs = server.document_count(), stop_words = server.stop_words().len(), "index built");
    Ok(server)
}

/// Non-empty lines of `path`, or of stdin when `path` is `None`.
pub fn read_queries(path: Option<&Path>) -> Result<Vec<String>> {
    let lines: Vec<String> = match path {
        Some(p) => BufReader::new(File::open(p).with_context(|| format!("opening {}", p.display()))?)
            .lines()
            .collect::<std::io::Result<_>>()?,
        None => std::io::stdin().lock().lines().collect::<std::io::Result<_>>()?,
    };
    Ok(lines.into_iter().filter(|l| !l.trim().is_empty()).collect())
}

pub fn policy(parallel: bool) -> ExecutionPolicy {
    if parallel {
        ExecutionPolicy::Parallel
    } else {
        ExecutionPolicy::Sequential
    }
}

/// Print the top documents for each query, `page_size` results per page.
pub fn run_search<W: Write>(
    out: &mut W,
    server: &SearchServer,
    queries: &[String],
    status: DocumentStatus,
    policy: ExecutionPolicy,
    page_size: usize,
) -> Result<()> {
    for query in queries {
        let found = server
            .find_top_documents_with(policy, query, |_, s, _| s == status)
            .with_context(|| format!("query {query:?}"))?;
        writeln!(out, "Results for \"{query}\":")?;
        for page in &paginate(&found, page_size) {
            writeln!(out, "{page}")?;
            writeln!(out, "Page break")?;
        }
    }
    Ok(())
}

pub fn run_match<W: Write>(
    out: &mut W,
    server: &SearchServer,
    query: &str,
    ids: &[DocId],
    policy: ExecutionPolicy,
) -> Result<()> {
    let ids: Vec<DocId> = if ids.is_empty() { server.iter().collect() } else { ids.to_vec() };
    for id in ids {
        let result = server.match_document_with(policy, query, id)?;
        writeln!(out, "{result}")?;
    }
    Ok(())
}

/// One JSON array per query, or one combined array with `joined`.
pub fn run_batch<W: Write>(out: &mut W, server: &SearchServer, queries: &[String], joined: bool) -> Result<()> {
    if joined {
        let docs: Vec<Document> = process_queries_joined(server, queries)?;
        writeln!(out, "{}", serde_json::to_string(&docs)?)?;
    } else {
        for docs in process_queries(server, queries)? {
            writeln!(out, "{}", serde_json::to_string(&docs)?)?;
        }
    }
    Ok(())
}

pub fn run_dedup<W: Write>(out: &mut W, server: &mut SearchServer) -> Result<()> {
    for id in remove_duplicates(server) {
        writeln!(out, "Found duplicate document id {id}")?;
    }
    writeln!(out, "{} documents left", server.document_count())?;
    Ok(())
}

/// Replay queries through a [`RequestQueue`] and report empty results in
/// the trailing window. Malformed queries are reported and skipped.
pub fn run_stats<W: Write>(out: &mut W, server: &SearchServer, queries: &[String], window: u64) -> Result<()> {
    let mut queue = RequestQueue::with_window(server, window);
    for query in queries {
        if let Err(err) = queue.add_find_request(query) {
            tracing::warn!(%query, error = %err, "skipping malformed query");
        }
    }
    writeln!(out, "Total empty requests: {}", queue.no_result_requests())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_stop_words_win_over_env() {
        assert_eq!(pick_stop_words(Some("a b".into()), Some("c".into())), "a b");
        assert_eq!(pick_stop_words(None, Some("c d".into())), "c d");
        assert_eq!(pick_stop_words(None, None), "");
    }

    #[test]
    fn reads_stop_words_from_env() {
        std::env::set_var(STOP_WORDS_ENV, "and in at");
        assert_eq!(resolve_stop_words(None), "and in at");
        assert_eq!(resolve_stop_words(Some("the".into())), "the");
        std::env::remove_var(STOP_WORDS_ENV);
        assert_eq!(resolve_stop_words(None), "");
    }
}
