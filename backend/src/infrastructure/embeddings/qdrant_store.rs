/// Qdrant vector store for the ticket collection
use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        with_payload_selector::SelectorOptions, Condition, CountPointsBuilder,
        CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, Document, FieldType,
        Filter, Fusion, Modifier, NamedVectors, PayloadIncludeSelector, PointStruct,
        PrefetchQueryBuilder, Query, QueryPointsBuilder, SparseVectorParamsBuilder,
        SparseVectorsConfigBuilder, UpsertPointsBuilder, Value, Vector, VectorParamsBuilder,
        VectorsConfigBuilder, WithPayloadSelector,
    },
    Payload, Qdrant,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dto::{properties, HybridQuery, SearchHit, TicketProperties};
use crate::application::ports::{FailedObject, TicketStore};
use crate::domain::{
    base::Entity,
    entities::Ticket,
    value_objects::{Category, EmbeddingVector, TicketId},
};

/// Each prefetch fetches this many candidates per requested result
const PREFETCH_FACTOR: u64 = 4;

const DENSE_VECTOR_NAME: &str = "dense";
const BM25_VECTOR_NAME: &str = "bm25";
/// Sparse BM25 vectors are computed by Qdrant itself from this model
const BM25_MODEL: &str = "qdrant/bm25";

/// Configuration for connecting to Qdrant
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// Qdrant gRPC URL (e.g., "http://localhost:6334")
    pub url: String,
    /// Optional API key for authentication
    pub api_key: Option<String>,
    /// Collection holding the tickets
    pub collection_name: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        QdrantConfig {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection_name: "CustomerSupport".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Ticket store backed by Qdrant
///
/// Every point carries a dense vector from the embedding model and a sparse
/// BM25 vector over the ticket text. Hybrid search runs entirely inside
/// Qdrant: a dense prefetch and a BM25 prefetch are fused with Reciprocal
/// Rank Fusion by the query API.
pub struct QdrantTicketStore {
    client: Qdrant,
    collection_name: String,
}

impl QdrantTicketStore {
    /// Build the client. No request is made until the first call, so this
    /// succeeds even while Qdrant is down.
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        info!("Connecting to Qdrant at {}", config.url);

        let mut builder = Qdrant::from_url(&config.url)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout);

        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder.build().context("Failed to build Qdrant client")?;

        Ok(QdrantTicketStore {
            client,
            collection_name: config.collection_name.clone(),
        })
    }

    /// Create a new store with default local connection
    pub fn new_local(collection_name: impl Into<String>) -> Result<Self> {
        Self::new(&QdrantConfig {
            collection_name: collection_name.into(),
            ..Default::default()
        })
    }

    async fn create_category_index(&self) -> Result<()> {
        self.client
            .create_field_index(
                CreateFieldIndexCollectionBuilder::new(
                    &self.collection_name,
                    properties::CATEGORY,
                    FieldType::Keyword,
                )
                .wait(true),
            )
            .await
            .with_context(|| {
                format!("Failed to create payload index on '{}'", properties::CATEGORY)
            })?;

        Ok(())
    }
}

#[async_trait]
impl TicketStore for QdrantTicketStore {
    async fn is_ready(&self) -> bool {
        match self.client.health_check().await {
            Ok(reply) => {
                debug!("Qdrant {} is healthy", reply.version);
                true
            }
            Err(e) => {
                warn!("Qdrant health check failed: {}", e);
                false
            }
        }
    }

    async fn collection_exists(&self) -> Result<bool> {
        self.client
            .collection_exists(&self.collection_name)
            .await
            .context("Failed to check collection")
    }

    async fn delete_collection(&self) -> Result<()> {
        self.client
            .delete_collection(&self.collection_name)
            .await
            .context("Failed to delete collection")?;
        info!("Deleted collection: {}", self.collection_name);
        Ok(())
    }

    async fn create_collection(&self, dimension_count: usize) -> Result<()> {
        self.client
            .create_collection(collection_schema(&self.collection_name, dimension_count))
            .await
            .context("Failed to create collection")?;

        self.create_category_index().await?;

        info!(
            "Created collection '{}' with {} dimensions",
            self.collection_name, dimension_count
        );
        Ok(())
    }

    async fn insert_batch(
        &self,
        batch: Vec<(Ticket, EmbeddingVector)>,
    ) -> Result<Vec<FailedObject>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Inserting batch of {} tickets", batch.len());

        let mut rejected = Vec::new();
        let mut points = Vec::with_capacity(batch.len());
        for (ticket, embedding) in batch {
            match ticket_point(&ticket, embedding) {
                Ok(point) => points.push(point),
                Err(e) => rejected.push(FailedObject::new(
                    ticket.id().as_str(),
                    format!("{:#}", e),
                )),
            }
        }

        if !points.is_empty() {
            self.client
                .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
                .await
                .context("Failed to insert batch")?;
        }

        debug!("Batch insert completed");
        Ok(rejected)
    }

    async fn hybrid_query(&self, query: &HybridQuery) -> Result<Vec<SearchHit>> {
        debug!("Hybrid query with limit: {}", query.limit);

        let response = self
            .client
            .query(hybrid_request(&self.collection_name, query))
            .await
            .context("Hybrid query failed")?;

        let hits: Vec<SearchHit> = response
            .result
            .into_iter()
            .map(|point| hit_from_payload(&point.payload))
            .collect();

        debug!("Found {} results", hits.len());
        Ok(hits)
    }

    async fn count(&self) -> Result<u64> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection_name).exact(true))
            .await
            .context("Failed to count tickets")?;

        Ok(response.result.map(|r| r.count).unwrap_or_default())
    }
}

/// Stable point id for a ticket, so the same ticket always maps to the same point
pub fn point_id(ticket_id: &TicketId) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, ticket_id.as_str().as_bytes()).to_string()
}

fn ticket_point(ticket: &Ticket, embedding: EmbeddingVector) -> Result<PointStruct> {
    let properties = serde_json::to_value(TicketProperties::from(ticket))
        .context("Failed to serialize ticket properties")?;
    let payload = Payload::try_from(properties).context("Failed to build payload")?;

    let vectors = NamedVectors::default()
        .add_vector(DENSE_VECTOR_NAME, Vector::new_dense(embedding.into_inner()))
        .add_vector(BM25_VECTOR_NAME, Document::new(keyword_text(ticket), BM25_MODEL));

    Ok(PointStruct::new(point_id(ticket.id()), vectors, payload))
}

/// Text the BM25 vector is built from
fn keyword_text(ticket: &Ticket) -> String {
    format!("{} {}", ticket.customer_issue(), ticket.resolution_response())
}

/// Named dense vector plus an IDF-weighted sparse vector for BM25
fn collection_schema(collection_name: &str, dimension_count: usize) -> CreateCollectionBuilder {
    let mut vectors_config = VectorsConfigBuilder::default();
    vectors_config.add_named_vector_params(
        DENSE_VECTOR_NAME,
        VectorParamsBuilder::new(dimension_count as u64, Distance::Cosine),
    );

    let mut sparse_vectors_config = SparseVectorsConfigBuilder::default();
    sparse_vectors_config.add_named_vector_params(
        BM25_VECTOR_NAME,
        SparseVectorParamsBuilder::default().modifier(Modifier::Idf),
    );

    CreateCollectionBuilder::new(collection_name)
        .vectors_config(vectors_config)
        .sparse_vectors_config(sparse_vectors_config)
}

/// Dense and BM25 prefetches fused with RRF. The category filter, when
/// present, restricts both prefetches and the fused result.
fn hybrid_request(collection_name: &str, query: &HybridQuery) -> QueryPointsBuilder {
    let limit = query.limit.value() as u64;
    let prefetch_limit = limit.saturating_mul(PREFETCH_FACTOR);

    let mut dense = PrefetchQueryBuilder::default()
        .query(Query::new_nearest(query.vector.dimensions().to_vec()))
        .using(DENSE_VECTOR_NAME)
        .limit(prefetch_limit);
    let mut keyword = PrefetchQueryBuilder::default()
        .query(Query::new_nearest(Document::new(query.text.clone(), BM25_MODEL)))
        .using(BM25_VECTOR_NAME)
        .limit(prefetch_limit);
    let mut request = QueryPointsBuilder::new(collection_name)
        .query(Query::new_fusion(Fusion::Rrf))
        .limit(limit)
        .with_payload(
            display_selector()
                .selector_options
                .expect("display selector always sets options"),
        );

    if let Some(filter) = category_filter(query.category.as_ref()) {
        dense = dense.filter(filter.clone());
        keyword = keyword.filter(filter.clone());
        request = request.filter(filter);
    }

    request.add_prefetch(dense).add_prefetch(keyword)
}

fn category_filter(category: Option<&Category>) -> Option<Filter> {
    category.map(|c| Filter::must([Condition::matches(properties::CATEGORY, c.to_string())]))
}

fn display_selector() -> WithPayloadSelector {
    WithPayloadSelector {
        selector_options: Some(SelectorOptions::Include(PayloadIncludeSelector {
            fields: properties::DISPLAY.iter().map(|f| f.to_string()).collect(),
        })),
    }
}

fn hit_from_payload(payload: &HashMap<String, Value>) -> SearchHit {
    let text = |field: &str| {
        payload
            .get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    SearchHit {
        customer_issue: text(properties::CUSTOMER_ISSUE),
        category: text(properties::CATEGORY),
        resolution_response: text(properties::RESOLUTION_RESPONSE),
    }
}
