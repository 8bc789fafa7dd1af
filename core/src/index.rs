use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{btree_set, BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Result, SearchError};
use crate::tokenizer::is_valid_word;

pub type DocId = i32;

/// Number of partitions the word -> postings map is split into.
pub const POSTING_SHARD_COUNT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentStatus::Actual => "actual",
            DocumentStatus::Irrelevant => "irrelevant",
            DocumentStatus::Banned => "banned",
            DocumentStatus::Removed => "removed",
        };
        f.write_str(s)
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "actual" => Ok(DocumentStatus::Actual),
            "irrelevant" => Ok(DocumentStatus::Irrelevant),
            "banned" => Ok(DocumentStatus::Banned),
            "removed" => Ok(DocumentStatus::Removed),
            other => Err(format!("unknown document status: {other}")),
        }
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ document_id = {}, relevance = {}, rating = {} }}", self.id, self.relevance, self.rating)
    }
}

/// Plus words of a query found in one document, plus that document's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub document_id: DocId,
    pub words: Vec<String>,
    pub status: DocumentStatus,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ document_id = {}, status = {}, words =", self.document_id, self.status)?;
        for word in &self.words {
            write!(f, " {word}")?;
        }
        f.write_str(" }")
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// doc id -> term frequency for one word.
pub(crate) type Postings = BTreeMap<DocId, f64>;

type WordShard = HashMap<String, Postings>;

/// Postings and per-document word frequencies, kept in sync.
///
/// A document id appears in a word's postings iff the word occurs in that
/// document, and then with the same frequency as in the document's own
/// word map. Postings that become empty are dropped.
#[derive(Debug)]
pub(crate) struct InvertedIndex {
    word_shards: Vec<WordShard>,
    documents: HashMap<DocId, DocumentData>,
    document_ids: BTreeSet<DocId>,
    document_words: HashMap<DocId, BTreeMap<String, f64>>,
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn shard_of(word: &str) -> usize {
    let mut hasher = DefaultHasher::new();
    word.hash(&mut hasher);
    (hasher.finish() % POSTING_SHARD_COUNT as u64) as usize
}

fn erase_posting(shard: &mut WordShard, word: &str, id: DocId) {
    if let Some(postings) = shard.get_mut(word) {
        postings.remove(&id);
        if postings.is_empty() {
            shard.remove(word);
        }
    }
}

/// Truncated arithmetic mean, 0 for no ratings.
pub(crate) fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self {
            word_shards: (0..POSTING_SHARD_COUNT).map(|_| WordShard::new()).collect(),
            documents: HashMap::new(),
            document_ids: BTreeSet::new(),
            document_words: HashMap::new(),
        }
    }

    /// Index `words` (already stripped of stop words) under `id`.
    ///
    /// All checks run before anything is written, so a failed call leaves
    /// the index untouched.
    pub fn add_document(&mut self, id: DocId, words: &[&str], status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        if id < 0 {
            return Err(SearchError::NegativeDocumentId(id));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::DuplicateDocumentId(id));
        }
        if let Some(bad) = words.iter().find(|w| !is_valid_word(w)) {
            return Err(SearchError::InvalidWord(bad.to_string()));
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for word in words {
            *counts.entry(*word).or_insert(0) += 1;
        }
        let total = words.len() as f64;
        let mut frequencies = BTreeMap::new();
        for (word, count) in counts {
            let tf = count as f64 / total;
            self.word_shards[shard_of(word)]
                .entry(word.to_string())
                .or_default()
                .insert(id, tf);
            frequencies.insert(word.to_string(), tf);
        }

        self.document_words.insert(id, frequencies);
        self.documents.insert(id, DocumentData { rating: compute_average_rating(ratings), status });
        self.document_ids.insert(id);
        Ok(())
    }

    pub fn postings(&self, word: &str) -> Option<&Postings> {
        self.word_shards[shard_of(word)].get(word)
    }

    pub fn contains_posting(&self, word: &str, id: DocId) -> bool {
        self.postings(word).is_some_and(|p| p.contains_key(&id))
    }

    pub fn document(&self, id: DocId) -> Option<DocumentData> {
        self.documents.get(&id).copied()
    }

    pub fn word_frequencies(&self, id: DocId) -> Option<&BTreeMap<String, f64>> {
        self.document_words.get(&id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.document_ids.contains(&id)
    }

    pub fn ids(&self) -> std::iter::Copied<btree_set::Iter<'_, DocId>> {
        self.document_ids.iter().copied()
    }

    /// Returns false when `id` was not indexed.
    pub fn remove_document(&mut self, id: DocId) -> bool {
        let Some(words) = self.take_document(id) else {
            return false;
        };
        for word in words.keys() {
            erase_posting(&mut self.word_shards[shard_of(word)], word, id);
        }
        true
    }

    /// Like [`remove_document`](Self::remove_document), erasing postings
    /// partition by partition on the rayon pool.
    pub fn remove_document_par(&mut self, id: DocId) -> bool {
        let Some(words) = self.take_document(id) else {
            return false;
        };
        let mut by_shard: Vec<Vec<&str>> = vec![Vec::new(); POSTING_SHARD_COUNT];
        for word in words.keys() {
            by_shard[shard_of(word)].push(word);
        }
        self.word_shards
            .par_iter_mut()
            .zip(by_shard.par_iter())
            .for_each(|(shard, words)| {
                for word in words {
                    erase_posting(shard, word, id);
                }
            });
        true
    }

    fn take_document(&mut self, id: DocId) -> Option<BTreeMap<String, f64>> {
        if !self.document_ids.remove(&id) {
            return None;
        }
        self.documents.remove(&id);
        Some(self.document_words.remove(&id).unwrap_or_default())
    }

    #[cfg(test)]
    fn vocabulary_len(&self) -> usize {
        self.word_shards.iter().map(HashMap::len).sum()
    }
}
