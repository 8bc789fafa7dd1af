use rayon::prelude::*;

use crate::error::{Result, SearchError};
use crate::index::Document;
use crate::server::SearchServer;

/// Run `find_top_documents` for every query on the rayon pool.
///
/// Results come back in input order. Every query runs to completion even
/// when a sibling fails; the first failing query (by position) is
/// reported as [`SearchError::Batch`].
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    let results: Vec<Result<Vec<Document>>> =
        queries.par_iter().map(|query| server.find_top_documents(query.as_ref())).collect();

    results
        .into_iter()
        .enumerate()
        .map(|(position, result)| {
            result.map_err(|source| {
                tracing::warn!(position, error = %source, "batch query failed");
                SearchError::Batch { position, source: Box::new(source) }
            })
        })
        .collect()
}

/// [`process_queries`] flattened into one sequence, concatenated in query
/// order without re-ranking.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::index::DocumentStatus;

    fn server() -> SearchServer {
        let mut server = SearchServer::from_stop_words_text("and with").unwrap();
        let texts = [
            "funny pet and nasty rat",
            "funny pet with curly hair",
            "funny pet and not very nasty rat",
            "pet with rat and rat and rat",
            "nasty rat with curly hair",
        ];
        for (id, text) in texts.iter().enumerate() {
            server.add_document(id as i32 + 1, text, DocumentStatus::Actual, &[1, 2]).unwrap();
        }
        server
    }

    #[test]
    fn keeps_input_order() {
        let server = server();
        let queries = ["nasty rat -not", "not very funny nasty pet", "curly hair"];
        let results = process_queries(&server, &queries).unwrap();
        let sizes: Vec<usize> = results.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 5, 2]);
        for (query, result) in queries.iter().zip(&results) {
            assert_eq!(result, &server.find_top_documents(query).unwrap());
        }
    }

    #[test]
    fn joined_concatenates_in_query_order() {
        let server = server();
        let queries = vec!["curly hair".to_string(), "nasty rat -not".to_string()];
        let joined = process_queries_joined(&server, &queries).unwrap();
        let ids: Vec<i32> = joined.iter().map(|d| d.id).collect();
        let expected: Vec<i32> = process_queries(&server, &queries)
            .unwrap()
            .into_iter()
            .flatten()
            .map(|d| d.id)
            .collect();
        assert_eq!(joined.len(), 5);
        assert_eq!(ids, expected);
    }

    #[test]
    fn reports_failing_position() {
        let server = server();
        let err = process_queries(&server, &["curly", "bad -", "--worse"]).unwrap_err();
        match &err {
            SearchError::Batch { position, source } => {
                assert_eq!(*position, 1);
                assert_eq!(**source, SearchError::InvalidMinusWord("-".into()));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
