//! In-memory full-text search over short text documents.
//!
//! Documents are indexed word by word (split on spaces, stop words dropped)
//! and ranked against queries by TF-IDF. Queries support minus words that
//! exclude every document containing them.

pub mod concurrent_map;
pub mod dedup;
pub mod error;
pub mod index;
pub mod paginator;
pub mod process_queries;
pub mod query;
pub mod request_queue;
pub mod scorer;
pub mod server;
pub mod stop_words;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use dedup::remove_duplicates;
pub use error::{ErrorKind, Result, SearchError};
pub use index::{DocId, Document, DocumentStatus, MatchResult};
pub use paginator::{paginate, Page, Paginator};
pub use process_queries::{process_queries, process_queries_joined};
pub use query::Query;
pub use request_queue::RequestQueue;
pub use scorer::{MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
pub use server::{ExecutionPolicy, SearchServer, DEFAULT_SHARD_COUNT};
pub use stop_words::StopWords;
