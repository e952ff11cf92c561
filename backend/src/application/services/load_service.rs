/// Load service: replaces the ticket collection with the contents of a data file
use crate::application::dto::TicketRecord;
use crate::application::ports::{FailedObject, TextEmbedder, TicketStore};
use crate::domain::{base::Entity, entities::Ticket, value_objects::EmbeddingVector};
use crate::infrastructure::file_system::{read_ticket_file, TicketFileError};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Ticket file error: {0}")]
    TicketFile(#[from] TicketFileError),

    #[error("Vector store error: {0}")]
    Store(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Tuning for batch loading
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Objects per insert call
    pub batch_size: usize,
    /// Loading stops once the failure count goes above this
    pub max_failures: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            batch_size: 100,
            max_failures: 100,
        }
    }
}

/// Service that loads tickets into the vector store
///
/// Every load drops and recreates the collection, so running it twice leaves
/// exactly one copy of each ticket. Loads are serialized.
pub struct LoadService {
    config: LoadConfig,
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn TicketStore>,
    load_lock: Mutex<()>,
}

impl LoadService {
    pub fn new(embedder: Arc<dyn TextEmbedder>, store: Arc<dyn TicketStore>) -> Self {
        Self::with_config(embedder, store, LoadConfig::default())
    }

    pub fn with_config(
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn TicketStore>,
        config: LoadConfig,
    ) -> Self {
        LoadService {
            config: LoadConfig {
                batch_size: config.batch_size.max(1),
                ..config
            },
            embedder,
            store,
            load_lock: Mutex::new(()),
        }
    }

    /// Load the JSON array of tickets at `path`
    pub async fn load_file(&self, path: &Path) -> LoadResult<LoadReport> {
        info!("Loading tickets from {}", path.display());
        let records = read_ticket_file(path).await?;
        self.load_records(records).await
    }

    /// Replace the collection with `records`
    pub async fn load_records(&self, records: Vec<TicketRecord>) -> LoadResult<LoadReport> {
        let _guard = self.load_lock.lock().await;
        let start_time = Instant::now();
        let total_tickets = records.len();

        let mut failed = Vec::new();
        let mut tickets = Vec::with_capacity(total_tickets);
        for record in records {
            let ticket_id = record.ticket_id.clone();
            match record.into_ticket() {
                Ok(ticket) => tickets.push(ticket),
                Err(e) => failed.push(FailedObject::new(ticket_id, e.to_string())),
            }
        }

        self.recreate_collection().await?;

        let mut inserted = 0;
        let mut aborted = self.too_many_failures(&failed);
        let batch_total = tickets.len().div_ceil(self.config.batch_size);

        for (i, batch) in tickets.chunks(self.config.batch_size).enumerate() {
            if aborted {
                break;
            }

            debug!(
                "Processing batch {}/{} ({} tickets)",
                i + 1,
                batch_total,
                batch.len()
            );

            let batch_failures = self.process_batch(batch).await;
            inserted += batch.len().saturating_sub(batch_failures.len());
            failed.extend(batch_failures);
            aborted = self.too_many_failures(&failed);
        }

        if let Some(first) = failed.first() {
            warn!("Number of failed imports: {}", failed.len());
            warn!("First failed object: {}", first);
        }

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Loaded {} of {} tickets into the vector store in {} ms",
            inserted, total_tickets, duration_ms
        );

        Ok(LoadReport {
            total_tickets,
            inserted,
            failed,
            aborted,
            duration_ms,
        })
    }

    fn too_many_failures(&self, failed: &[FailedObject]) -> bool {
        let over = failed.len() > self.config.max_failures;
        if over {
            error!("Batch import stopped due to excessive errors.");
        }
        over
    }

    /// Drop the collection if present, then create it empty
    async fn recreate_collection(&self) -> LoadResult<()> {
        let exists = self
            .store
            .collection_exists()
            .await
            .map_err(|e| LoadError::Store(format!("{:#}", e)))?;

        if exists {
            info!("Deleting existing ticket collection");
            self.store
                .delete_collection()
                .await
                .map_err(|e| LoadError::Store(format!("{:#}", e)))?;
        }

        self.store
            .create_collection(self.embedder.dimension_count())
            .await
            .map_err(|e| LoadError::Store(format!("{:#}", e)))
    }

    /// Embed and insert one batch, returning the objects that did not make it
    async fn process_batch(&self, batch: &[Ticket]) -> Vec<FailedObject> {
        let texts: Vec<&str> = batch.iter().map(|t| t.customer_issue()).collect();

        let embeddings = match self.embedder.embed_batch(texts).await {
            Ok(embeddings) if embeddings.len() == batch.len() => embeddings,
            Ok(embeddings) => {
                let message = format!(
                    "Embedder returned {} vectors for {} texts",
                    embeddings.len(),
                    batch.len()
                );
                return fail_all(batch, &message);
            }
            Err(e) => {
                let message = format!("Failed to generate embeddings: {:#}", e);
                warn!("{}", message);
                return fail_all(batch, &message);
            }
        };

        let items: Vec<(Ticket, EmbeddingVector)> =
            batch.iter().cloned().zip(embeddings).collect();

        match self.store.insert_batch(items).await {
            Ok(rejected) => rejected,
            Err(e) => {
                let message = format!("Failed to insert batch: {:#}", e);
                warn!("{}", message);
                fail_all(batch, &message)
            }
        }
    }
}

fn fail_all(batch: &[Ticket], message: &str) -> Vec<FailedObject> {
    batch
        .iter()
        .map(|t| FailedObject::new(t.id().as_str(), message))
        .collect()
}

/// Summary of a load operation
#[derive(Debug)]
pub struct LoadReport {
    pub total_tickets: usize,
    pub inserted: usize,
    pub failed: Vec<FailedObject>,
    /// True when loading stopped early because of too many failures
    pub aborted: bool,
    pub duration_ms: u64,
}

impl LoadReport {
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_tickets == 0 {
            return 100.0;
        }
        (self.inserted as f64 / self.total_tickets as f64) * 100.0
    }
}
