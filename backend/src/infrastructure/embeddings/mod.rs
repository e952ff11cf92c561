/// Embedding model and vector store adapters
mod fastembed_service;
mod qdrant_store;

pub use fastembed_service::FastEmbedService;
pub use qdrant_store::{point_id, QdrantConfig, QdrantTicketStore};
