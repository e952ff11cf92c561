/// Value objects for the domain layer
use super::base::{DomainError, DomainResult, ValueObject};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a support Ticket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidValue("TicketId cannot be empty".to_string()));
        }
        Ok(TicketId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for TicketId {}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ticket category label (e.g. "Billing", "Technical")
///
/// Categories are matched exactly by the vector store, so the value is kept
/// as given and only checked for emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    pub fn new(category: impl Into<String>) -> DomainResult<Self> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(DomainError::InvalidValue("Category cannot be empty".to_string()));
        }
        Ok(Category(category))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Category {}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum number of results a search may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TopK(usize);

impl TopK {
    pub const DEFAULT: usize = 5;
    pub const MAX: usize = 100;

    pub fn new(value: usize) -> DomainResult<Self> {
        if value == 0 || value > Self::MAX {
            return Err(DomainError::InvalidValue(format!(
                "top_k must be between 1 and {}",
                Self::MAX
            )));
        }
        Ok(TopK(value))
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl Default for TopK {
    fn default() -> Self {
        TopK(Self::DEFAULT)
    }
}

impl ValueObject for TopK {}

impl fmt::Display for TopK {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sentence-embedding models available to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmbeddingModel {
    /// sentence-transformers/all-MiniLM-L6-v2
    #[default]
    AllMiniLML6V2,
    /// sentence-transformers/all-MiniLM-L12-v2
    AllMiniLML12V2,
}

impl EmbeddingModel {
    /// Hub name of the model
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddingModel::AllMiniLML6V2 => "all-MiniLM-L6-v2",
            EmbeddingModel::AllMiniLML12V2 => "all-MiniLM-L12-v2",
        }
    }

    /// Number of dimensions in vectors produced by this model
    pub fn dimension_count(&self) -> usize {
        match self {
            EmbeddingModel::AllMiniLML6V2 | EmbeddingModel::AllMiniLML12V2 => 384,
        }
    }
}

impl ValueObject for EmbeddingModel {}

impl FromStr for EmbeddingModel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches("sentence-transformers/");
        match name.to_ascii_lowercase().as_str() {
            "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            _ => Err(DomainError::InvalidValue(format!(
                "Unsupported embedding model: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A dense embedding produced by a sentence-embedding model
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector {
    dimensions: Vec<f32>,
}

impl EmbeddingVector {
    pub fn new(dimensions: Vec<f32>) -> DomainResult<Self> {
        if dimensions.is_empty() {
            return Err(DomainError::InvalidValue(
                "Embedding vector cannot be empty".to_string(),
            ));
        }
        if dimensions.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::InvalidValue(
                "Embedding vector contains non-finite values".to_string(),
            ));
        }
        Ok(EmbeddingVector { dimensions })
    }

    pub fn dimensions(&self) -> &[f32] {
        &self.dimensions
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.dimensions
    }

    /// Cosine similarity with another vector of the same dimension
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> DomainResult<f32> {
        if self.dimension_count() != other.dimension_count() {
            return Err(DomainError::InvalidOperation(format!(
                "Dimension mismatch: {} vs {}",
                self.dimension_count(),
                other.dimension_count()
            )));
        }

        let dot: f32 = self
            .dimensions
            .iter()
            .zip(&other.dimensions)
            .map(|(a, b)| a * b)
            .sum();
        let norm_a = self.dimensions.iter().map(|v| v * v).sum::<f32>().sqrt();
        let norm_b = other.dimensions.iter().map(|v| v * v).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }
        Ok(dot / (norm_a * norm_b))
    }
}

impl ValueObject for EmbeddingVector {}
