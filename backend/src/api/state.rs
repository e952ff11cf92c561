use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{TextEmbedder, TicketStore};
use crate::application::services::{LoadConfig, LoadService, SearchService};

/// Shared handler state. The embedder and store behind the services are
/// created once and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub loader: Arc<LoadService>,
    /// File loaded by `GET /load-data`
    pub data_file: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn TicketStore>,
        load_config: LoadConfig,
        data_file: impl Into<PathBuf>,
    ) -> Self {
        AppState {
            search: Arc::new(SearchService::new(embedder.clone(), store.clone())),
            loader: Arc::new(LoadService::with_config(embedder, store, load_config)),
            data_file: Arc::new(data_file.into()),
        }
    }
}
