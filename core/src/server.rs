use rayon::prelude::*;
use std::collections::{btree_set, BTreeMap};
use std::iter::Copied;

use crate::error::{Result, SearchError};
use crate::index::{DocId, Document, DocumentStatus, InvertedIndex, MatchResult};
use crate::query::Query;
use crate::scorer::{find_all_documents, find_all_documents_par, rank};
use crate::stop_words::StopWords;
use crate::tokenizer::split_words;

/// Default shard count of the relevance accumulator used by parallel search.
pub const DEFAULT_SHARD_COUNT: usize = 100;

static NO_WORDS: BTreeMap<String, f64> = BTreeMap::new();

/// Whether an operation may spread its work over the rayon pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}

/// Searchable document collection.
///
/// Read methods (`find_top_documents*`, `match_document*`,
/// `word_frequencies`) take `&self` and may run concurrently from many
/// threads. Mutations take `&mut self`, so the borrow checker keeps them
/// from overlapping with reads.
#[derive(Debug)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
    accumulator_shards: usize,
}

impl SearchServer {
    /// Build with an explicit collection of stop words.
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_stop_words(StopWords::new(stop_words)?))
    }

    /// Build with space-separated stop words, e.g. `"and in at"`.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::with_stop_words(StopWords::from_text(text)?))
    }

    pub fn with_stop_words(stop_words: StopWords) -> Self {
        Self { stop_words, index: InvertedIndex::new(), accumulator_shards: DEFAULT_SHARD_COUNT }
    }

    /// Override the shard count of the parallel relevance accumulator.
    pub fn with_accumulator_shards(mut self, shards: usize) -> Self {
        self.accumulator_shards = shards.max(1);
        self
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn add_document(&mut self, id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        let words: Vec<&str> = split_words(text).into_iter().filter(|w| !self.stop_words.contains(w)).collect();
        self.index.add_document(id, &words, status, ratings)?;
        tracing::debug!(id, words = words.len(), %status, "added document");
        Ok(())
    }

    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, move |_, document_status, _| document_status == status)
    }

    /// Top documents admitted by `predicate(id, status, rating)`.
    pub fn find_top_documents_by<F>(&self, raw_query: &str, predicate: F) -> Result<Vec<Document>>
    where
        F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    /// Rank documents against `raw_query`: TF-IDF summed over plus words,
    /// documents containing any minus word dropped, at most
    /// [`MAX_RESULT_DOCUMENT_COUNT`](crate::MAX_RESULT_DOCUMENT_COUNT) results.
    ///
    /// An empty index yields no results (after the query is validated).
    pub fn find_top_documents_with<F>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: F,
    ) -> Result<Vec<Document>>
    where
        F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        if self.index.document_count() == 0 {
            return Ok(Vec::new());
        }
        let matched = match policy {
            ExecutionPolicy::Sequential => find_all_documents(&self.index, &query, &predicate),
            ExecutionPolicy::Parallel => {
                find_all_documents_par(&self.index, &query, &predicate, self.accumulator_shards)
            }
        };
        Ok(rank(matched))
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count()
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.index.contains(id)
    }

    /// Live document ids in ascending order.
    pub fn iter(&self) -> Copied<btree_set::Iter<'_, DocId>> {
        self.index.ids()
    }

    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<MatchResult> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, id)
    }

    /// Plus words of `raw_query` present in document `id`. Any minus word
    /// present in the document empties the word list.
    pub fn match_document_with(&self, policy: ExecutionPolicy, raw_query: &str, id: DocId) -> Result<MatchResult> {
        let data = self.index.document(id).ok_or(SearchError::DocumentNotFound(id))?;
        let query = Query::parse(raw_query, &self.stop_words)?;
        let index = &self.index;

        let excluded = match policy {
            ExecutionPolicy::Sequential => query.minus_words.iter().any(|w| index.contains_posting(w, id)),
            ExecutionPolicy::Parallel => query.minus_words.par_iter().any(|w| index.contains_posting(w, id)),
        };
        let words = if excluded {
            Vec::new()
        } else {
            match policy {
                ExecutionPolicy::Sequential => query
                    .plus_words
                    .iter()
                    .filter(|w| index.contains_posting(w, id))
                    .map(|w| w.to_string())
                    .collect(),
                ExecutionPolicy::Parallel => query
                    .plus_words
                    .par_iter()
                    .filter(|w| index.contains_posting(w, id))
                    .map(|w| w.to_string())
                    .collect(),
            }
        };
        Ok(MatchResult { document_id: id, words, status: data.status })
    }

    /// Word -> term frequency for document `id`; empty when `id` is unknown.
    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<String, f64> {
        self.index.word_frequencies(id).unwrap_or(&NO_WORDS)
    }

    /// Remove `id` from every index. Unknown ids are ignored.
    pub fn remove_document(&mut self, id: DocId) {
        self.remove_document_with(ExecutionPolicy::Sequential, id)
    }

    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, id: DocId) {
        let removed = match policy {
            ExecutionPolicy::Sequential => self.index.remove_document(id),
            ExecutionPolicy::Parallel => self.index.remove_document_par(id),
        };
        if removed {
            tracing::debug!(id, ?policy, "removed document");
        }
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = Copied<btree_set::Iter<'a, DocId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn cat_server() -> SearchServer {
        let mut server = SearchServer::from_stop_words_text("").unwrap();
        server.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        server
    }

    #[test]
    fn stop_words_are_not_indexed() {
        let server = cat_server();
        assert_eq!(server.find_top_documents("in").unwrap().len(), 1);

        let mut server = SearchServer::from_stop_words_text("in the").unwrap();
        server.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        assert!(server.find_top_documents("in").unwrap().is_empty());
        assert_eq!(server.word_frequencies(42).len(), 2);
    }

    #[test]
    fn empty_document_never_matches_plus_words() {
        let mut server = SearchServer::new(Vec::<String>::new()).unwrap();
        server.add_document(42, "", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        assert!(server.find_top_documents("cat").unwrap().is_empty());
        assert_eq!(server.document_count(), 1);
    }

    #[test]
    fn empty_index_returns_nothing_but_validates_query() {
        let server = SearchServer::from_stop_words_text("a").unwrap();
        assert!(server.find_top_documents("cat").unwrap().is_empty());
        assert!(server.find_top_documents("--cat").is_err());
    }

    #[test]
    fn match_reports_plus_words_and_status() {
        let mut server = SearchServer::from_stop_words_text("").unwrap();
        server.add_document(42, "cat in the city", DocumentStatus::Banned, &[1, 2, 3]).unwrap();
        for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
            let result = server.match_document_with(policy, "cat in the city", 42).unwrap();
            assert_eq!(result.words, vec!["cat", "city", "in", "the"]);
            assert_eq!(result.status, DocumentStatus::Banned);

            let result = server.match_document_with(policy, "cat in the -city", 42).unwrap();
            assert!(result.words.is_empty());
            assert_eq!(result.status, DocumentStatus::Banned);

            assert!(server.match_document_with(policy, "dog", 42).unwrap().words.is_empty());
        }
    }

    #[test]
    fn match_unknown_document_is_not_found() {
        let server = cat_server();
        let err = server.match_document("cat", 7).unwrap_err();
        assert_eq!(err, SearchError::DocumentNotFound(7));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn accumulator_shards_clamped() {
        let server = cat_server().with_accumulator_shards(0);
        let found = server.find_top_documents_with(ExecutionPolicy::Parallel, "cat", |_, _, _| true).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn iterates_ids_in_ascending_order() {
        let mut server = cat_server();
        server.add_document(3, "dog", DocumentStatus::Actual, &[]).unwrap();
        server.add_document(17, "bird", DocumentStatus::Actual, &[]).unwrap();
        assert_eq!((&server).into_iter().collect::<Vec<_>>(), vec![3, 17, 42]);
    }
}
