use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Category, EmbeddingVector, TopK};

/// A hybrid (vector + keyword) query handed to the vector store
#[derive(Debug, Clone, PartialEq)]
pub struct HybridQuery {
    /// Raw query text, used for the keyword side
    pub text: String,
    /// Embedding of `text`, used for the vector side
    pub vector: EmbeddingVector,
    /// Optional exact-match filter on the category property
    pub category: Option<Category>,
    pub limit: TopK,
}

impl HybridQuery {
    pub fn new(text: impl Into<String>, vector: EmbeddingVector, limit: TopK) -> Self {
        Self {
            text: text.into(),
            vector,
            category: None,
            limit,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// One search result: the display projection of a stored ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "Customer Issue")]
    pub customer_issue: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Resolution Response")]
    pub resolution_response: String,
}

/// Response body of `GET /search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// Response body of `GET /search/filter`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredSearchResponse {
    pub query: String,
    pub category: String,
    pub results: Vec<SearchHit>,
}
