use std::collections::{BTreeSet, HashSet};

use crate::index::DocId;
use crate::server::SearchServer;

/// Remove documents whose set of indexed words equals that of a document
/// with a smaller id. Word frequencies are ignored. Returns the removed ids
/// in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let mut seen: HashSet<BTreeSet<&str>> = HashSet::new();
    let mut duplicates = Vec::new();
    for id in server.iter() {
        let words: BTreeSet<&str> = server.word_frequencies(id).keys().map(String::as_str).collect();
        if !seen.insert(words) {
            duplicates.push(id);
        }
    }

    for &id in &duplicates {
        server.remove_document(id);
        tracing::info!(id, "found duplicate document id {id}");
    }
    duplicates
}
