/// FastEmbed service for local embedding generation
use anyhow::{Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::ports::TextEmbedder;
use crate::domain::value_objects::{EmbeddingModel, EmbeddingVector};

/// Service for generating embeddings using fastembed
///
/// The model is downloaded (or read from the local cache) once, when the
/// service is created.
pub struct FastEmbedService {
    model: Arc<Mutex<TextEmbedding>>,
    model_type: EmbeddingModel,
}

impl FastEmbedService {
    /// Create a new FastEmbed service with the specified model
    pub async fn new(model_type: EmbeddingModel) -> Result<Self> {
        info!("Initializing FastEmbed service with model: {}", model_type);

        let fastembed_model = match model_type {
            EmbeddingModel::AllMiniLML6V2 => FastEmbedModel::AllMiniLML6V2,
            EmbeddingModel::AllMiniLML12V2 => FastEmbedModel::AllMiniLML12V2,
        };

        let model = TextEmbedding::try_new(
            InitOptions::new(fastembed_model).with_show_download_progress(true),
        )
        .context("Failed to initialize FastEmbed model")?;

        info!("FastEmbed model initialized successfully");

        Ok(FastEmbedService {
            model: Arc::new(Mutex::new(model)),
            model_type,
        })
    }

    /// Create a new FastEmbed service with the default model
    pub async fn new_default() -> Result<Self> {
        Self::new(EmbeddingModel::default()).await
    }

    /// Inference is CPU-bound, so it runs on the blocking pool
    async fn run_model(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let embeddings = tokio::task::spawn_blocking(move || {
            let mut model = model.blocking_lock();
            model.embed(texts, None)
        })
        .await
        .context("Embedding task failed")??;

        Ok(embeddings)
    }
}

#[async_trait]
impl TextEmbedder for FastEmbedService {
    async fn embed_text(&self, text: &str) -> Result<EmbeddingVector> {
        debug!("Generating embedding for text (length: {})", text.len());

        let embedding_vec = self
            .run_model(vec![text.to_string()])
            .await
            .context("Failed to generate embedding")?
            .into_iter()
            .next()
            .context("No embedding returned")?;

        EmbeddingVector::new(embedding_vec)
            .map_err(|e| anyhow::anyhow!("Invalid embedding vector: {}", e))
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<EmbeddingVector>> {
        debug!("Generating embeddings for batch of {} texts", texts.len());

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let owned = texts.into_iter().map(str::to_string).collect();
        let embeddings = self
            .run_model(owned)
            .await
            .context("Failed to generate batch embeddings")?;

        let mut result = Vec::with_capacity(embeddings.len());
        for embedding_vec in embeddings {
            let embedding = EmbeddingVector::new(embedding_vec)
                .map_err(|e| anyhow::anyhow!("Invalid embedding vector: {}", e))?;
            result.push(embedding);
        }

        debug!("Generated {} embeddings successfully", result.len());
        Ok(result)
    }

    fn dimension_count(&self) -> usize {
        self.model_type.dimension_count()
    }
}
