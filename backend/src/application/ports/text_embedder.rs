use anyhow::Result;
use async_trait::async_trait;

use crate::domain::value_objects::EmbeddingVector;

/// Turns text into fixed-length vectors with a sentence-embedding model.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate embedding for a single text
    async fn embed_text(&self, text: &str) -> Result<EmbeddingVector>;

    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<EmbeddingVector>>;

    /// Dimension of every vector this embedder returns
    fn dimension_count(&self) -> usize;
}
