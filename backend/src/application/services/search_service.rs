/// Search service: embeds the query and delegates to the store's hybrid search
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::application::dto::{HybridQuery, SearchHit};
use crate::application::ports::{TextEmbedder, TicketStore};
use crate::domain::value_objects::{Category, TopK};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    #[error("Failed to embed query: {0}")]
    Embedding(String),

    #[error("Vector store query failed: {0}")]
    Store(String),
}

pub type SearchResult<T> = Result<T, SearchError>;

pub struct SearchService {
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn TicketStore>,
}

impl SearchService {
    pub fn new(embedder: Arc<dyn TextEmbedder>, store: Arc<dyn TicketStore>) -> Self {
        SearchService { embedder, store }
    }

    /// Hybrid search over all tickets
    pub async fn search(&self, query: &str, top_k: TopK) -> SearchResult<Vec<SearchHit>> {
        self.run(query, None, top_k).await
    }

    /// Hybrid search restricted to tickets whose category equals `category`
    pub async fn search_with_filter(
        &self,
        query: &str,
        category: &Category,
        top_k: TopK,
    ) -> SearchResult<Vec<SearchHit>> {
        self.run(query, Some(category), top_k).await
    }

    pub async fn is_ready(&self) -> bool {
        self.store.is_ready().await
    }

    async fn run(
        &self,
        query: &str,
        category: Option<&Category>,
        top_k: TopK,
    ) -> SearchResult<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidRequest(
                "query cannot be empty".to_string(),
            ));
        }

        debug!(
            "Searching for: '{}' (category: {:?}, top_k: {})",
            query,
            category.map(Category::as_str),
            top_k
        );

        let vector = self
            .embedder
            .embed_text(query)
            .await
            .map_err(|e| SearchError::Embedding(format!("{:#}", e)))?;

        let mut hybrid = HybridQuery::new(query, vector, top_k);
        if let Some(category) = category {
            hybrid = hybrid.with_category(category.clone());
        }

        let hits = self
            .store
            .hybrid_query(&hybrid)
            .await
            .map_err(|e| SearchError::Store(format!("{:#}", e)))?;

        debug!("Found {} results", hits.len());
        Ok(hits)
    }
}
