use crate::DocId;

/// Broad classification of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed stop word, document text, query term, or document id.
    InvalidInput,
    /// The operation referenced a document id that is not live.
    NotFound,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("document id must be non-negative, got {0}")]
    NegativeDocumentId(DocId),
    #[error("document already exists: {0}")]
    DuplicateDocumentId(DocId),
    #[error("word {0:?} contains control characters")]
    InvalidWord(String),
    #[error("stop word {0:?} contains control characters")]
    InvalidStopWord(String),
    #[error("query contains an empty word")]
    EmptyQueryWord,
    #[error("invalid minus word {0:?}")]
    InvalidMinusWord(String),
    #[error("document not found: {0}")]
    DocumentNotFound(DocId),
    #[error("query #{position} failed: {source}")]
    Batch {
        position: usize,
        #[source]
        source: Box<SearchError>,
    },
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::DocumentNotFound(_) => ErrorKind::NotFound,
            SearchError::Batch { source, .. } => source.kind(),
            _ => ErrorKind::InvalidInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
