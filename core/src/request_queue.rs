use std::collections::VecDeque;

use crate::error::Result;
use crate::index::{DocId, Document, DocumentStatus};
use crate::server::SearchServer;

/// Requests per window: one tick per request, a day of minutes.
pub const DEFAULT_WINDOW: u64 = 1440;

#[derive(Debug, Clone, Copy)]
struct QueryResult {
    timestamp: u64,
    results: usize,
}

/// Tracks how many of the most recent requests found nothing.
///
/// Every request advances a logical clock by one tick; requests older than
/// `window` ticks fall out of the statistics.
#[derive(Debug)]
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<QueryResult>,
    no_result_requests: usize,
    current_time: u64,
    window: u64,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self::with_window(server, DEFAULT_WINDOW)
    }

    pub fn with_window(server: &'a SearchServer, window: u64) -> Self {
        Self { server, requests: VecDeque::new(), no_result_requests: 0, current_time: 0, window: window.max(1) }
    }

    /// Failed queries are returned as errors and not recorded.
    pub fn add_find_request_by<F>(&mut self, raw_query: &str, predicate: F) -> Result<Vec<Document>>
    where
        F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let found = self.server.find_top_documents_by(raw_query, predicate)?;
        self.record(found.len());
        Ok(found)
    }

    pub fn add_find_request_by_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        let found = self.server.find_top_documents_by_status(raw_query, status)?;
        self.record(found.len());
        Ok(found)
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let found = self.server.find_top_documents(raw_query)?;
        self.record(found.len());
        Ok(found)
    }

    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    fn record(&mut self, results: usize) {
        self.current_time += 1;
        while let Some(front) = self.requests.front() {
            if self.current_time - front.timestamp < self.window {
                break;
            }
            if front.results == 0 {
                self.no_result_requests -= 1;
            }
            self.requests.pop_front();
        }
        self.requests.push_back(QueryResult { timestamp: self.current_time, results });
        if results == 0 {
            self.no_result_requests += 1;
        }
    }
}
