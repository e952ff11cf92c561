//! In-memory stand-ins for the embedding model and the vector store
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use support_search::application::dto::{HybridQuery, SearchHit, TicketProperties, TicketRecord};
use support_search::application::ports::{FailedObject, TextEmbedder, TicketStore};
use support_search::domain::{base::Entity, entities::Ticket, value_objects::EmbeddingVector};

pub const TEST_DIMENSIONS: usize = 32;

/// Bag-of-words embedder: every word bumps one hashed bucket
pub struct HashingEmbedder {
    fail: AtomicBool,
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self {
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn vectorize(text: &str) -> EmbeddingVector {
        let mut dimensions = vec![0.0; TEST_DIMENSIONS];
        for word in words(text) {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            dimensions[(hasher.finish() % TEST_DIMENSIONS as u64) as usize] += 1.0;
        }
        EmbeddingVector::new(dimensions).unwrap()
    }
}

#[async_trait]
impl TextEmbedder for HashingEmbedder {
    async fn embed_text(&self, text: &str) -> Result<EmbeddingVector> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("model not loaded"));
        }
        Ok(Self::vectorize(text))
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<EmbeddingVector>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("model not loaded"));
        }
        Ok(texts.into_iter().map(Self::vectorize).collect())
    }

    fn dimension_count(&self) -> usize {
        TEST_DIMENSIONS
    }
}

struct StoredTicket {
    properties: TicketProperties,
    vector: EmbeddingVector,
}

struct Collection {
    dimension_count: usize,
    tickets: Vec<StoredTicket>,
}

/// Vector store kept in memory. Hybrid search fuses a cosine ranking and a
/// BM25 ranking over issue and resolution text with Reciprocal Rank Fusion.
pub struct InMemoryTicketStore {
    ready: AtomicBool,
    fail_inserts: AtomicBool,
    rejected_ids: Mutex<HashSet<String>>,
    extra_rejections: AtomicUsize,
    collection: Mutex<Option<Collection>>,
    insert_calls: AtomicUsize,
    collections_created: AtomicUsize,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            fail_inserts: AtomicBool::new(false),
            rejected_ids: Mutex::new(HashSet::new()),
            extra_rejections: AtomicUsize::new(0),
            collection: Mutex::new(None),
            insert_calls: AtomicUsize::new(0),
            collections_created: AtomicUsize::new(0),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Make every insert call fail as a whole
    pub fn set_failing_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Reject these tickets individually
    pub fn reject_ids(&self, ids: &[&str]) {
        let mut rejected = self.rejected_ids.lock().unwrap();
        rejected.extend(ids.iter().map(|id| id.to_string()));
    }

    /// Report `count` more rejections per insert call than really happened
    pub fn report_extra_rejections(&self, count: usize) {
        self.extra_rejections.store(count, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn collections_created(&self) -> usize {
        self.collections_created.load(Ordering::SeqCst)
    }

    pub fn dimension_count(&self) -> Option<usize> {
        self.collection
            .lock()
            .unwrap()
            .as_ref()
            .map(|c| c.dimension_count)
    }

    /// Stored properties of one ticket
    pub fn stored(&self, ticket_id: &str) -> Option<TicketProperties> {
        self.collection.lock().unwrap().as_ref().and_then(|c| {
            c.tickets
                .iter()
                .find(|t| t.properties.ticket_id == ticket_id)
                .map(|t| t.properties.clone())
        })
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn collection_exists(&self) -> Result<bool> {
        Ok(self.collection.lock().unwrap().is_some())
    }

    async fn delete_collection(&self) -> Result<()> {
        *self.collection.lock().unwrap() = None;
        Ok(())
    }

    async fn create_collection(&self, dimension_count: usize) -> Result<()> {
        let mut collection = self.collection.lock().unwrap();
        if collection.is_some() {
            return Err(anyhow!("collection already exists"));
        }
        *collection = Some(Collection {
            dimension_count,
            tickets: Vec::new(),
        });
        self.collections_created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn insert_batch(
        &self,
        batch: Vec<(Ticket, EmbeddingVector)>,
    ) -> Result<Vec<FailedObject>> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset by peer"));
        }

        let rejected_ids = self.rejected_ids.lock().unwrap().clone();
        let mut guard = self.collection.lock().unwrap();
        let collection = guard
            .as_mut()
            .ok_or_else(|| anyhow!("collection does not exist"))?;

        let mut rejected = Vec::new();
        for (ticket, vector) in batch {
            let ticket_id = ticket.id().as_str().to_string();
            if rejected_ids.contains(&ticket_id) {
                rejected.push(FailedObject::new(ticket_id, "object rejected"));
                continue;
            }
            if vector.dimension_count() != collection.dimension_count {
                rejected.push(FailedObject::new(ticket_id, "wrong vector dimension"));
                continue;
            }

            collection.tickets.retain(|t| t.properties.ticket_id != ticket_id);
            collection.tickets.push(StoredTicket {
                properties: TicketProperties::from(&ticket),
                vector,
            });
        }

        for n in 0..self.extra_rejections.load(Ordering::SeqCst) {
            rejected.push(FailedObject::new(format!("phantom-{}", n), "object rejected"));
        }

        Ok(rejected)
    }

    async fn hybrid_query(&self, query: &HybridQuery) -> Result<Vec<SearchHit>> {
        let guard = self.collection.lock().unwrap();
        let collection = guard
            .as_ref()
            .ok_or_else(|| anyhow!("collection does not exist"))?;

        let candidates: Vec<&StoredTicket> = collection
            .tickets
            .iter()
            .filter(|t| {
                query
                    .category
                    .as_ref()
                    .map_or(true, |c| t.properties.category == c.as_str())
            })
            .collect();

        let mut dense: Vec<(f32, usize)> = candidates
            .iter()
            .enumerate()
            .map(|(i, t)| (query.vector.cosine_similarity(&t.vector).unwrap_or(0.0), i))
            .collect();
        dense.sort_by(|a, b| b.0.total_cmp(&a.0));

        let documents: Vec<Vec<String>> = candidates
            .iter()
            .map(|t| words(&keyword_text(&t.properties)).collect())
            .collect();
        let mut keyword: Vec<(f32, usize)> = bm25_scores(&query.text, &documents)
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0.0)
            .map(|(i, score)| (score, i))
            .collect();
        keyword.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut fused = vec![0.0f32; candidates.len()];
        for ranking in [&dense, &keyword] {
            for (rank, (_, i)) in ranking.iter().enumerate() {
                fused[*i] += 1.0 / (RRF_K + rank as f32 + 1.0);
            }
        }
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|a, b| fused[*b].total_cmp(&fused[*a]));

        Ok(order
            .into_iter()
            .take(query.limit.value())
            .map(|i| {
                let t = candidates[i];
                SearchHit {
                    customer_issue: t.properties.customer_issue.clone(),
                    category: t.properties.category.clone(),
                    resolution_response: t.properties.resolution_response.clone(),
                }
            })
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        let guard = self.collection.lock().unwrap();
        let collection = guard
            .as_ref()
            .ok_or_else(|| anyhow!("collection does not exist"))?;
        Ok(collection.tickets.len() as u64)
    }
}

/// Rank constant for Reciprocal Rank Fusion
const RRF_K: f32 = 2.0;

fn keyword_text(properties: &TicketProperties) -> String {
    format!(
        "{} {}",
        properties.customer_issue, properties.resolution_response
    )
}

/// Okapi BM25 of `query` against each tokenized document
fn bm25_scores(query: &str, documents: &[Vec<String>]) -> Vec<f32> {
    const K1: f32 = 1.2;
    const B: f32 = 0.75;

    let n = documents.len() as f32;
    let average_length =
        documents.iter().map(Vec::len).sum::<usize>() as f32 / n.max(1.0);
    let terms: HashSet<String> = words(query).collect();

    documents
        .iter()
        .map(|document| {
            let length = document.len() as f32;
            terms
                .iter()
                .map(|term| {
                    let frequency = document.iter().filter(|w| *w == term).count() as f32;
                    if frequency == 0.0 {
                        return 0.0;
                    }
                    let containing = documents.iter().filter(|d| d.contains(term)).count() as f32;
                    let idf = (1.0 + (n - containing + 0.5) / (containing + 0.5)).ln();
                    let norm = K1 * (1.0 - B + B * length / average_length.max(1.0));
                    idf * frequency * (K1 + 1.0) / (frequency + norm)
                })
                .sum()
        })
        .collect()
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

const CATEGORIES: [&str; 4] = ["Billing", "Technical", "Shipping", "Account"];

/// `count` synthetic tickets cycling through four categories
pub fn sample_records(count: usize) -> Vec<TicketRecord> {
    (0..count)
        .map(|i| {
            let category = CATEGORIES[i % CATEGORIES.len()];
            let (issue, response) = match category {
                "Billing" => (
                    format!("I was charged twice and want a refund (order {})", i),
                    "We issued a refund for the duplicate charge.",
                ),
                "Technical" => (
                    format!("The app crashes when I open settings (build {})", i),
                    "Please update to the latest version.",
                ),
                "Shipping" => (
                    format!("My package {} has not arrived yet", i),
                    "We shipped a replacement with express delivery.",
                ),
                _ => (
                    format!("I cannot reset my password for account {}", i),
                    "We sent a new password reset link.",
                ),
            };

            TicketRecord {
                ticket_id: format!("T{:04}", i),
                category: category.to_string(),
                customer_issue: issue,
                resolution_response: response.to_string(),
            }
        })
        .collect()
}

/// Write `records` as a JSON data file inside `dir`
pub fn write_data_file(dir: &std::path::Path, records: &[TicketRecord]) -> std::path::PathBuf {
    let path = dir.join("customer_support_data.json");
    std::fs::write(&path, serde_json::to_vec_pretty(records).unwrap()).unwrap();
    path
}
