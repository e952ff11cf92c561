use anyhow::Result;
use async_trait::async_trait;

use crate::application::dto::{HybridQuery, SearchHit};
use crate::domain::{entities::Ticket, value_objects::EmbeddingVector};

/// An object the store refused to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedObject {
    pub ticket_id: String,
    pub message: String,
}

impl FailedObject {
    pub fn new(ticket_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FailedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ticket {}: {}", self.ticket_id, self.message)
    }
}

/// Store trait for the ticket collection in an external vector database.
///
/// Implementations own the collection name. Indexing, scoring and filtering
/// all happen inside the database; this trait only describes the calls the
/// service makes.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Whether the database answers its health check
    async fn is_ready(&self) -> bool;

    async fn collection_exists(&self) -> Result<bool>;

    /// Drops the collection and every object in it.
    async fn delete_collection(&self) -> Result<()>;

    /// Creates the collection with the fixed ticket schema and vectors of
    /// `dimension_count` dimensions.
    async fn create_collection(&self, dimension_count: usize) -> Result<()>;

    /// Inserts a batch of tickets with their vectors.
    ///
    /// Returns the objects the store rejected individually; an `Err` means
    /// the whole batch was not written.
    async fn insert_batch(
        &self,
        batch: Vec<(Ticket, EmbeddingVector)>,
    ) -> Result<Vec<FailedObject>>;

    /// Runs a hybrid query, best match first: a vector ranking and a
    /// keyword (BM25) ranking fused by the database.
    async fn hybrid_query(&self, query: &HybridQuery) -> Result<Vec<SearchHit>>;

    /// Number of objects in the collection
    async fn count(&self) -> Result<u64>;
}
