/// Service configuration
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::application::services::LoadConfig;
use crate::domain::value_objects::EmbeddingModel;
use crate::infrastructure::embeddings::QdrantConfig;

/// Everything the service needs at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Vector store connection and collection
    pub qdrant: QdrantConfig,
    /// Embedding model to use
    pub model: EmbeddingModel,
    /// JSON file loaded by `GET /load-data`
    pub data_file: PathBuf,
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Batch size and failure threshold for loading
    pub load: LoadConfig,
    /// Load the data file before serving requests
    pub load_on_startup: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            qdrant: QdrantConfig::default(),
            model: EmbeddingModel::default(),
            data_file: PathBuf::from("customer_support_data.json"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            load: LoadConfig::default(),
            load_on_startup: false,
        }
    }
}
