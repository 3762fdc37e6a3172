//! Query service.
//!
//! Answers free-text queries against the store's current index. The service
//! holds no state of its own; every query reads one complete snapshot.

use std::sync::Arc;

use serde::Serialize;

use super::index::{SearchHit, SearchIndex};
use crate::core::ContentStore;
use crate::domain::ContentItem;

/// Outcome of a query
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", content = "hits", rename_all = "snake_case")]
pub enum SearchResponse {
    /// The query was empty; nothing was searched
    Idle,

    /// Ranked hits, best first (possibly none)
    Results(Vec<SearchHit>),
}

impl SearchResponse {
    pub fn is_idle(&self) -> bool {
        matches!(self, SearchResponse::Idle)
    }

    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchResponse::Idle => &[],
            SearchResponse::Results(hits) => hits,
        }
    }

    /// Matched items in rank order
    pub fn into_items(self) -> Vec<Arc<ContentItem>> {
        match self {
            SearchResponse::Idle => Vec::new(),
            SearchResponse::Results(hits) => hits.into_iter().map(|h| h.item).collect(),
        }
    }
}

/// Run one query against an index
pub fn run_query(index: &SearchIndex, query: &str, limit: usize) -> SearchResponse {
    if query.trim().is_empty() {
        return SearchResponse::Idle;
    }
    SearchResponse::Results(index.search(query, limit))
}

/// Search entry point used by the palette and CLI
#[derive(Clone)]
pub struct SearchService {
    store: Arc<ContentStore>,
    limit: Option<usize>,
}

impl SearchService {
    /// Create a service returning the configured number of results
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store, limit: None }
    }

    /// Override the result cap
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Ranked, scored response for `query`
    pub fn query(&self, query: &str) -> SearchResponse {
        let snapshot = self.store.snapshot();
        let limit = self.limit.unwrap_or(snapshot.index.options().limit);
        run_query(&snapshot.index, query, limit)
    }

    /// Ranked items for `query`; empty for an empty query or no matches
    pub fn search(&self, query: &str) -> Vec<Arc<ContentItem>> {
        self.query(query).into_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::StaticSource;
    use crate::search::SearchOptions;

    fn service() -> SearchService {
        let store = ContentStore::open(Box::new(StaticSource::demo()), SearchOptions::default());
        SearchService::new(Arc::new(store))
    }

    #[test]
    fn test_empty_query_is_idle() {
        let service = service();
        assert!(service.query("").is_idle());
        assert!(service.query("   \t").is_idle());
        assert!(service.search("").is_empty());
    }

    #[test]
    fn test_no_match_is_not_idle() {
        let service = service();
        let response = service.query("zzzzqqqq");
        assert!(!response.is_idle());
        assert!(response.hits().is_empty());
    }

    #[test]
    fn test_search_finds_demo_content() {
        let service = service();
        let items = service.search("next.js");
        assert!(!items.is_empty());
        assert_eq!(items[0].slug, "building-scalable-web-applications");
    }

    #[test]
    fn test_limit_override() {
        let service = service().with_limit(1);
        assert_eq!(service.search("next").len(), 1);
    }
}
