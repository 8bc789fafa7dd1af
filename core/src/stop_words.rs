use std::collections::HashSet;

use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_words};

/// Immutable, case-sensitive set of words excluded from indexing and queries.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Build from an explicit collection. Empty strings are dropped and
    /// duplicates collapse.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidStopWord(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build from space-separated text, e.g. `"and in at"`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_words(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_duplicates_and_empties() {
        let stop = StopWords::new(["in", "", "in", "the"]).unwrap();
        assert_eq!(stop.len(), 2);
        assert!(stop.contains("in"));
        assert!(!stop.contains(""));
    }

    #[test]
    fn is_case_sensitive() {
        let stop = StopWords::from_text("and in at").unwrap();
        assert!(stop.contains("and"));
        assert!(!stop.contains("And"));
    }

    #[test]
    fn rejects_control_characters() {
        let err = StopWords::new(["ok", "b\x02ad"]).unwrap_err();
        assert_eq!(err, SearchError::InvalidStopWord("b\x02ad".into()));
    }
}
