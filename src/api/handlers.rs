//! Health and search handlers.

use crate::error::ApiError;
use crate::models::{HealthResponse, SearchQuery, SearchResponse};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use std::sync::Arc;
use tracing::warn;

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Search
// ============================================================================

/// Look up a security by ticker.
#[utoipa::path(
    get,
    path = "/api",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching quotes", body = SearchResponse),
        (status = 400, description = "Missing symbol"),
        (status = 502, description = "Quote service unavailable")
    ),
    tag = "Search"
)]
pub async fn search_securities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let symbol = query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("symbol query parameter is required".into()))?;

    let response = state.search.search(symbol).await.map_err(|e| {
        warn!("search for {} failed: {}", symbol, e);
        ApiError::Upstream(e.to_string())
    })?;

    Ok(Json(response))
}
