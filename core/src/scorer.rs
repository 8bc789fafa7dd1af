use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::concurrent_map::ConcurrentMap;
use crate::index::{DocId, Document, DocumentStatus, InvertedIndex};
use crate::query::Query;

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
/// Relevances closer than this are ranked by rating instead.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// ln(N / df). Postings are never empty, so `df >= 1`; callers must not
/// ask for the idf of an empty index.
fn inverse_document_freq(index: &InvertedIndex, document_freq: usize) -> f64 {
    (index.document_count() as f64 / document_freq as f64).ln()
}

fn into_documents(index: &InvertedIndex, relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
    relevance
        .into_iter()
        .filter_map(|(id, relevance)| index.document(id).map(|data| Document { id, relevance, rating: data.rating }))
        .collect()
}

pub(crate) fn find_all_documents<F>(index: &InvertedIndex, query: &Query<'_>, predicate: &F) -> Vec<Document>
where
    F: Fn(DocId, DocumentStatus, i32) -> bool,
{
    let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
    for word in &query.plus_words {
        let Some(postings) = index.postings(word) else { continue };
        let idf = inverse_document_freq(index, postings.len());
        for (&id, &tf) in postings {
            let Some(data) = index.document(id) else { continue };
            if predicate(id, data.status, data.rating) {
                *relevance.entry(id).or_insert(0.0) += tf * idf;
            }
        }
    }
    for word in &query.minus_words {
        let Some(postings) = index.postings(word) else { continue };
        for id in postings.keys() {
            relevance.remove(id);
        }
    }
    into_documents(index, relevance)
}

/// Same result as [`find_all_documents`], with plus and minus words spread
/// over the rayon pool and relevance summed in a sharded accumulator.
pub(crate) fn find_all_documents_par<F>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &F,
    shard_count: usize,
) -> Vec<Document>
where
    F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(shard_count);
    query.plus_words.par_iter().for_each(|word| {
        let Some(postings) = index.postings(word) else { return };
        let idf = inverse_document_freq(index, postings.len());
        for (&id, &tf) in postings {
            let Some(data) = index.document(id) else { continue };
            if predicate(id, data.status, data.rating) {
                *relevance.access(id) += tf * idf;
            }
        }
    });
    query.minus_words.par_iter().for_each(|word| {
        let Some(postings) = index.postings(word) else { return };
        for id in postings.keys() {
            relevance.erase(id);
        }
    });
    into_documents(index, relevance.into_ordinary_map())
}

/// Sort by descending relevance, ordering near-equal relevances by
/// descending rating, and keep the top [`MAX_RESULT_DOCUMENT_COUNT`].
pub(crate) fn rank(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    let mut start = 0;
    while start < documents.len() {
        let head = documents[start].relevance;
        let end = documents[start..]
            .iter()
            .position(|d| (head - d.relevance).abs() >= RELEVANCE_EPSILON)
            .map_or(documents.len(), |offset| start + offset);
        documents[start..end].sort_by(|a, b| b.rating.cmp(&a.rating));
        start = end;
    }
    documents.truncate(MAX_RESULT_DOCUMENT_COUNT);
    documents
}
