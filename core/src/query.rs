use crate::error::{Result, SearchError};
use crate::stop_words::StopWords;
use crate::tokenizer::{is_valid_word, split_words};

/// A parsed query. Both word lists are sorted and free of repeats; stop
/// words never appear in either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'a> {
    pub plus_words: Vec<&'a str>,
    pub minus_words: Vec<&'a str>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
}

fn parse_query_word(word: &str) -> Result<QueryWord<'_>> {
    if word.is_empty() {
        return Err(SearchError::EmptyQueryWord);
    }
    let (data, is_minus) = match word.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (word, false),
    };
    if data.is_empty() || data.starts_with('-') {
        return Err(SearchError::InvalidMinusWord(word.to_string()));
    }
    if !is_valid_word(data) {
        return Err(SearchError::InvalidWord(word.to_string()));
    }
    Ok(QueryWord { data, is_minus })
}

impl<'a> Query<'a> {
    /// Parse raw query text. Any malformed word fails the whole query.
    pub fn parse(text: &'a str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Query::default();
        for word in split_words(text) {
            let word = parse_query_word(word)?;
            if stop_words.contains(word.data) {
                continue;
            }
            if word.is_minus {
                query.minus_words.push(word.data);
            } else {
                query.plus_words.push(word.data);
            }
        }
        query.plus_words.sort_unstable();
        query.plus_words.dedup();
        query.minus_words.sort_unstable();
        query.minus_words.dedup();
        tracing::debug!(plus = query.plus_words.len(), minus = query.minus_words.len(), "parsed query");
        Ok(query)
    }
}
