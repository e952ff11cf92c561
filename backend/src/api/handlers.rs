use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{error::ApiError, state::AppState};
use crate::application::dto::{FilteredSearchResponse, SearchResponse};
use crate::domain::value_objects::{Category, TopK};

/// Query string of `GET /search`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Query string of `GET /search/filter`
#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub query: String,
    pub category: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    TopK::DEFAULT
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadDataResponse {
    pub message: String,
    pub total_tickets: usize,
    pub inserted: usize,
    pub failed: usize,
}

/// `GET /`
pub async fn root() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Welcome to the Semantic Search Engine API!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /load-data`: replace the collection with the configured data file
pub async fn load_data(State(state): State<AppState>) -> Result<Json<LoadDataResponse>, ApiError> {
    let report = state.loader.load_file(&state.data_file).await?;

    if report.aborted {
        return Err(ApiError::Internal(format!(
            "Batch import stopped due to excessive errors: {} of {} tickets failed",
            report.failure_count(),
            report.total_tickets
        )));
    }

    Ok(Json(LoadDataResponse {
        message: "Data loaded successfully".to_string(),
        total_tickets: report.total_tickets,
        inserted: report.inserted,
        failed: report.failure_count(),
    }))
}

/// `GET /search?query=..&top_k=..`
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;
    let top_k = TopK::new(params.top_k)?;

    let results = state.search.search(&params.query, top_k).await?;
    info!("search '{}' returned {} results", params.query, results.len());

    Ok(Json(SearchResponse {
        query: params.query,
        results,
    }))
}

/// `GET /search/filter?query=..&category=..&top_k=..`
pub async fn search_with_filter(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<FilteredSearchResponse>, ApiError> {
    let Query(params) = params?;
    let top_k = TopK::new(params.top_k)?;
    let category = Category::new(params.category.clone())?;

    let results = state
        .search
        .search_with_filter(&params.query, &category, top_k)
        .await?;
    info!(
        "search '{}' in category '{}' returned {} results",
        params.query,
        category,
        results.len()
    );

    Ok(Json(FilteredSearchResponse {
        query: params.query,
        category: params.category,
        results,
    }))
}

/// Rejects requests with 503 while the vector store is unreachable
pub async fn require_store_ready(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.search.is_ready().await {
        warn!("Rejecting {}: vector store is not ready", request.uri().path());
        return Err(ApiError::StoreUnavailable);
    }
    Ok(next.run(request).await)
}
